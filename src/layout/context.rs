//! Style frames and per-level layout state.
//!
//! A [`Frame`] is the style every run at one nesting level inherits. Frames
//! are never mutated once built; a nested expression gets a fresh copy with
//! its overrides. [`Level`] is the mutable part: cursor, container and the
//! growing rectangle.

use crate::font::FontHandler;
use crate::grammar::Decoration;

use super::rect::{BoundingRect, extend_or_init};

/// Inherited style of one nesting level
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub level: usize,
    pub font_size: f64,
    pub color: Option<String>,
    pub font: FontHandler,
    /// Explicit weight override, written on the level's container
    pub bold: Option<bool>,
    /// Explicit slant override, written on the level's container
    pub italic: Option<bool>,
    /// The font was chosen by markup and must be written on the container
    pub custom_font: bool,
    /// This level is one line of a two-line stack
    pub in_stack: bool,
}

impl Frame {
    /// Style of the outermost level
    pub fn root(font: FontHandler, font_size: f64) -> Self {
        Frame {
            level: 0,
            font_size,
            color: None,
            font,
            bold: None,
            italic: None,
            custom_font: false,
            in_stack: false,
        }
    }

    /// Style of a nested expression, its font size scaled by `scale`.
    pub fn child(&self, scale: f64) -> Self {
        Frame {
            level: self.level + 1,
            font_size: self.font_size * scale,
            color: self.color.clone(),
            font: self.font.clone(),
            bold: self.bold,
            italic: self.italic,
            custom_font: false,
            in_stack: false,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_font(mut self, font: FontHandler) -> Self {
        self.font = font;
        self.custom_font = true;
        self
    }

    pub fn with_scale(mut self, factor: f64) -> Self {
        self.font_size *= factor;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn stacked(mut self) -> Self {
        self.in_stack = true;
        self
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Mutable state of one nesting level
#[derive(Debug, Clone, PartialEq)]
pub struct Level<N> {
    /// Container all primitives of this level go into, created on demand
    pub group: Option<N>,
    pub x: f64,
    pub y: f64,
    pub rect: Option<BoundingRect>,
    /// Width correction of a lone narrow glyph, consumed by accents
    pub xgap: f64,
    /// Pending decoration; cleared when a lone text run applies it itself
    pub decoration: Option<Decoration>,
}

impl<N> Level<N> {
    pub fn new(group: Option<N>) -> Self {
        Level {
            group,
            x: 0.0,
            y: 0.0,
            rect: None,
            xgap: 0.0,
            decoration: None,
        }
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = Some(decoration);
        self
    }

    pub fn extend(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        extend_or_init(&mut self.rect, x1, y1, x2, y2);
    }

    /// Occupied area; an empty level occupies nothing at its origin.
    pub fn area(&self) -> BoundingRect {
        self.rect.unwrap_or_default()
    }

    /// Advance the cursor by a rounded amount.
    pub fn shift_x(&mut self, dx: f64) {
        self.x += super::path::round(dx);
    }
}
