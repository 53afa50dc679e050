//! Render settings and per-call arguments.

use crate::font::FontHandler;
use crate::layout::BoundingRect;

/// Settings shared by every label rendered in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Always use the approximate width model, even if the sink can measure
    pub approx_text_size: bool,
    /// Non-interactive output: links get no tooltip or hover effect
    pub batch_mode: bool,
    /// The output embeds symbol.ttf, so remapped runs can name it directly
    pub load_symbol_ttf: bool,
}

/// Arguments of one label render.
///
/// `text_rect` and `plain` are outputs filled in by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextArgs {
    pub text: String,
    pub font: FontHandler,
    pub font_size: f64,
    /// Color used where the markup sets none
    pub color: Option<String>,
    /// Use approximate metrics for this call only
    pub fast: bool,
    /// Translate escape tokens even on the plain-text path
    pub simple_latex: bool,
    pub text_rect: Option<BoundingRect>,
    pub plain: bool,
}

impl TextArgs {
    pub fn new(text: impl Into<String>, font: FontHandler) -> Self {
        let font_size = font.size;
        TextArgs {
            text: text.into(),
            font,
            font_size,
            color: None,
            fast: false,
            simple_latex: false,
            text_rect: None,
            plain: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn fast(mut self) -> Self {
        self.fast = true;
        self
    }
}
