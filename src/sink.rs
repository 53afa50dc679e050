//! The drawing surface the layout engine emits into.
//!
//! The engine never owns a document; it appends groups, links, text runs and
//! paths through [`OutputSink`] and asks the sink to measure text when exact
//! metrics are wanted.

use crate::font::SymbolFont;
use crate::grammar::Decoration;

/// Source text of a run drawn in a symbol font, kept so the run can be
/// re-encoded for outputs that embed the symbol font itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSource {
    pub text: String,
    pub font: SymbolFont,
}

/// A single text run as handed to the sink
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub fill: Option<String>,
    pub font_size: f64,
    pub source: Option<SymbolSource>,
}

/// Stroke and fill of a path; unset paint is left to the surface default
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathStyle {
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill: Option<String>,
}

impl PathStyle {
    /// CSS `style` attribute value
    pub fn to_css(&self) -> String {
        let mut entries = Vec::with_capacity(3);
        if let Some(stroke) = &self.stroke {
            entries.push(format!("stroke:{stroke}"));
        }
        if let Some(width) = self.stroke_width {
            entries.push(format!("stroke-width:{}", crate::layout::fmt_num(width)));
        }
        if let Some(fill) = &self.fill {
            entries.push(format!("fill:{fill}"));
        }
        entries.join(";")
    }
}

/// Rendered size of a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Drawing surface consumed by the layout engine
pub trait OutputSink {
    /// Handle to a node of the surface
    type Node: Copy + Eq + std::fmt::Debug;

    fn append_group(&mut self, parent: Self::Node) -> Self::Node;

    /// Append a hyperlink container; `title` becomes a hover tooltip and
    /// enables hover underlining.
    fn append_link(&mut self, parent: Self::Node, href: &str, title: Option<&str>) -> Self::Node;

    fn append_text(&mut self, parent: Self::Node, run: TextRun) -> Self::Node;

    /// Append a path with placeholder data; the data is usually set once the
    /// geometry it depends on is known.
    fn append_path(&mut self, parent: Self::Node, style: PathStyle) -> Self::Node;

    fn set_path_data(&mut self, path: Self::Node, d: String);

    fn set_text_decoration(&mut self, node: Self::Node, decoration: Decoration);

    fn set_font_weight(&mut self, node: Self::Node, weight: &str);

    fn set_font_style(&mut self, node: Self::Node, style: &str);

    /// Set the font family and, when given, weight and style.
    fn set_font(
        &mut self,
        node: Self::Node,
        family: &str,
        weight: Option<&str>,
        style: Option<&str>,
    );

    /// Replace the node's translation.
    fn translate(&mut self, node: Self::Node, x: f64, y: f64);

    /// Exact extent of a text run, if this surface can measure text.
    fn measure_text(&self, _node: Self::Node) -> Option<TextExtent> {
        None
    }

    fn remove(&mut self, node: Self::Node);
}
