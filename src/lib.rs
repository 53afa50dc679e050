//! Layout of ROOT `TLatex` markup into positioned SVG primitives.
//!
//! Markup such as `#frac{#alpha}{x^{2}}` is laid out into text runs and
//! vector paths (fraction bars, radicals, brackets, accents) emitted through
//! an [`OutputSink`]. [`SvgCanvas`] is the in-memory sink that serializes to
//! SVG. Labels without markup take a plain single-run path, and labels meant
//! for a real TeX engine go through the [`bridge`].
//!
//! ```rust
//! use tlatex::{is_plain_text, translate_latex};
//!
//! assert_eq!(translate_latex("#alpha#beta"), "\u{3b1}\u{3b2}");
//! assert!(!is_plain_text("x^{2}"));
//! ```

pub mod args;
pub mod bridge;
pub mod canvas;
pub mod errors;
pub mod fallback;
pub mod font;
pub mod grammar;
pub mod layout;
mod log;
pub mod metrics;
pub mod options;
pub mod sink;
pub mod symbols;

pub use canvas::SvgCanvas;
pub use errors::{BridgeError, LayoutError};
pub use fallback::{is_plain_text, produce_plain_text, remap_symbol_ttf_code, replace_symbols};
pub use font::{FontHandler, RootPalette, StyleProvider};
pub use layout::{BoundingRect, LayoutEngine};
pub use metrics::approximate_label_width;
pub use options::{RenderOptions, TextArgs};
pub use sink::OutputSink;
pub use symbols::translate_latex;

/// Lay out `args.text` into `node`.
///
/// On return `args.text_rect` holds the area covered so far, also when the
/// markup was malformed.
pub fn produce_latex<S, P>(
    sink: &mut S,
    styles: &P,
    options: &RenderOptions,
    node: S::Node,
    args: &mut TextArgs,
) -> Result<(), LayoutError>
where
    S: OutputSink,
    P: StyleProvider + ?Sized,
{
    LayoutEngine::new(sink, styles, *options, args).layout(node, args)
}

/// Where a label ended up
#[derive(Debug)]
pub struct DrawnLabel<N> {
    /// Group or text run holding the label
    pub node: N,
    /// Why the markup was drawn as plain text instead
    pub error: Option<LayoutError>,
}

/// Draw a label, choosing between the plain and the markup path.
///
/// Markup is laid out into a fresh group. If it turns out malformed the
/// group is removed again and the raw text is drawn as a plain run, so a
/// label is never left half drawn.
pub fn draw_label<S, P>(
    sink: &mut S,
    styles: &P,
    options: &RenderOptions,
    node: S::Node,
    args: &mut TextArgs,
) -> DrawnLabel<S::Node>
where
    S: OutputSink,
    P: StyleProvider + ?Sized,
{
    if is_plain_text(&args.text) {
        return DrawnLabel {
            node: produce_plain_text(sink, node, options, args),
            error: None,
        };
    }

    let group = sink.append_group(node);
    match produce_latex(sink, styles, options, group, args) {
        Ok(()) => DrawnLabel {
            node: group,
            error: None,
        },
        Err(err) => {
            log::warn!(text = %args.text, "markup failed, drawing plain text");
            sink.remove(group);
            args.text_rect = None;
            DrawnLabel {
                node: produce_plain_text(sink, node, options, args),
                error: Some(err),
            }
        }
    }
}

/// Lay out `markup` with the default palette and serialize it as a
/// standalone SVG document fitted to the label.
pub fn render_to_svg(markup: &str, font: FontHandler) -> Result<String, miette::Report> {
    let mut canvas = SvgCanvas::new();
    let root = canvas.root();
    let mut args = TextArgs::new(markup, font);
    let options = RenderOptions::default();

    if is_plain_text(markup) {
        produce_plain_text(&mut canvas, root, &options, &mut args);
    } else {
        produce_latex(&mut canvas, &RootPalette, &options, root, &mut args)?;
    }

    canvas.to_svg_document(args.text_rect.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasNode;

    #[test]
    fn plain_labels_skip_layout() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let mut args = TextArgs::new("hello", FontHandler::new(42, 20.0));
        let drawn = draw_label(&mut canvas, &RootPalette, &RenderOptions::default(), root, &mut args);
        assert!(args.plain);
        assert!(drawn.error.is_none());
        assert!(matches!(canvas.node(drawn.node), Some(CanvasNode::Text(_))));
    }

    #[test]
    fn malformed_markup_falls_back_to_raw_text() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let mut args = TextArgs::new("x^{2", FontHandler::new(42, 20.0));
        let drawn = draw_label(&mut canvas, &RootPalette, &RenderOptions::default(), root, &mut args);

        assert!(matches!(drawn.error, Some(LayoutError::UnbalancedBraces { .. })));
        let texts: Vec<_> = canvas.texts().into_iter().map(|(_, t)| t.text.clone()).collect();
        assert_eq!(texts, ["x^{2"]);
        assert_eq!(canvas.children(root).len(), 1);
        assert!(args.text_rect.is_some());
    }

    #[test]
    fn markup_is_drawn_into_a_group() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let mut args = TextArgs::new("#frac{a}{b}", FontHandler::new(42, 20.0));
        let drawn = draw_label(&mut canvas, &RootPalette, &RenderOptions::default(), root, &mut args);
        assert!(drawn.error.is_none());
        assert!(!args.plain);
        assert!(matches!(canvas.node(drawn.node), Some(CanvasNode::Group(_))));
        assert_eq!(canvas.paths().len(), 1);
    }

    #[test]
    fn render_to_svg_reports_malformed_markup() {
        assert!(render_to_svg("#frac{a}{b", FontHandler::default()).is_err());
        let svg = render_to_svg("#alpha", FontHandler::default()).unwrap();
        assert!(svg.contains("viewBox"));
    }
}
