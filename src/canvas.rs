//! In-memory SVG surface.
//!
//! [`SvgCanvas`] records everything the layout engine emits as an arena of
//! primitives. It can measure text through a pluggable [`TextMeasurer`],
//! answer queries about what was drawn, and serialize the result as an SVG
//! document through `facet-svg`.

use enum_dispatch::enum_dispatch;
use facet_svg::facet_xml::{self, SerializeOptions};
use facet_svg::{Anchor, Group, Path, SVG_NS, Svg, SvgNode, TSpan, Text, Title};
use glam::{DVec2, dvec2};

use crate::fallback::remap_symbol_ttf_code;
use crate::font::{SYMBOL_FAMILY, SymbolFont};
use crate::grammar::Decoration;
use crate::layout::{BoundingRect, fmt_num};
use crate::sink::{OutputSink, PathStyle, SymbolSource, TextExtent, TextRun};

/// Handle to a primitive of an [`SvgCanvas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Family, weight and style set on a node; unset values are inherited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSpec {
    pub family: Option<String>,
    pub weight: Option<String>,
    pub style: Option<String>,
}

impl FontSpec {
    fn inherit(&mut self, parent: &FontSpec) {
        if self.family.is_none() {
            self.family = parent.family.clone();
        }
        if self.weight.is_none() {
            self.weight = parent.weight.clone();
        }
        if self.style.is_none() {
            self.style = parent.style.clone();
        }
    }
}

/// Everything a measurer gets to know about a run
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub text: &'a str,
    pub font_size: f64,
    /// Font after inheritance from enclosing groups
    pub font: FontSpec,
}

/// Exact text metrics, e.g. from a font rasterizer
pub trait TextMeasurer {
    fn measure(&self, style: &TextStyle<'_>) -> Option<TextExtent>;
}

impl<F> TextMeasurer for F
where
    F: Fn(&TextStyle<'_>) -> Option<TextExtent>,
{
    fn measure(&self, style: &TextStyle<'_>) -> Option<TextExtent> {
        self(style)
    }
}

fn transform_attr(offset: Option<DVec2>) -> Option<String> {
    offset
        .filter(|v| *v != DVec2::ZERO)
        .map(|v| format!("translate({},{})", fmt_num(v.x), fmt_num(v.y)))
}

/// Behaviour shared by all canvas primitives
#[enum_dispatch]
pub trait Primitive {
    /// Current translation of the primitive
    fn offset(&self) -> Option<DVec2>;

    fn set_offset(&mut self, offset: DVec2);

    /// Font attributes, for primitives that carry them
    fn font_mut(&mut self) -> Option<&mut FontSpec> {
        None
    }

    fn font(&self) -> Option<&FontSpec> {
        None
    }

    /// Build the SVG element, given the already converted children.
    fn to_svg(&self, children: Vec<SvgNode>) -> SvgNode;
}

/// Container (`<g>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    pub offset: Option<DVec2>,
    pub font: FontSpec,
}

impl Primitive for GroupNode {
    fn offset(&self) -> Option<DVec2> {
        self.offset
    }

    fn set_offset(&mut self, offset: DVec2) {
        self.offset = Some(offset);
    }

    fn font_mut(&mut self) -> Option<&mut FontSpec> {
        Some(&mut self.font)
    }

    fn font(&self) -> Option<&FontSpec> {
        Some(&self.font)
    }

    fn to_svg(&self, children: Vec<SvgNode>) -> SvgNode {
        SvgNode::G(Group {
            transform: transform_attr(self.offset),
            font_family: self.font.family.clone(),
            font_weight: self.font.weight.clone(),
            font_style: self.font.style.clone(),
            children,
        })
    }
}

/// Hyperlink (`<a>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkNode {
    pub href: String,
    /// Tooltip; present links underline on hover
    pub title: Option<String>,
    pub offset: Option<DVec2>,
}

impl Primitive for LinkNode {
    fn offset(&self) -> Option<DVec2> {
        self.offset
    }

    fn set_offset(&mut self, offset: DVec2) {
        self.offset = Some(offset);
    }

    fn to_svg(&self, mut children: Vec<SvgNode>) -> SvgNode {
        if let Some(title) = &self.title {
            children.insert(
                0,
                SvgNode::Title(Title {
                    content: title.clone(),
                }),
            );
        }
        SvgNode::A(Anchor {
            href: Some(self.href.clone()),
            transform: transform_attr(self.offset),
            class: self.title.as_ref().map(|_| "tlatex-hover".to_string()),
            children,
        })
    }
}

/// One piece of a text run split for PDF output
#[derive(Debug, Clone, PartialEq)]
pub struct SpanPiece {
    pub text: String,
    /// Symbol family the piece is drawn in, `None` for the run's own font
    pub family: Option<&'static str>,
}

/// Content and font of a run before PDF remapping
#[derive(Debug, Clone, PartialEq)]
struct SavedRun {
    text: String,
    family: Option<String>,
}

/// Text run (`<text>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub fill: Option<String>,
    pub font_size: f64,
    pub font: FontSpec,
    pub decoration: Option<Decoration>,
    pub offset: Option<DVec2>,
    /// Source text when the run is drawn in a symbol font
    pub source: Option<SymbolSource>,
    /// Pieces replacing `text` after PDF remapping
    pub spans: Vec<SpanPiece>,
    saved: Option<SavedRun>,
}

impl TextNode {
    fn from_run(run: TextRun) -> Self {
        TextNode {
            text: run.text,
            x: run.x,
            y: run.y,
            fill: run.fill,
            font_size: run.font_size,
            source: run.source,
            ..Default::default()
        }
    }

    /// Position of the run's anchor relative to its container
    pub fn anchor(&self) -> DVec2 {
        self.offset.unwrap_or(DVec2::ZERO) + dvec2(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    /// Visible content, joining PDF spans if present
    pub fn content(&self) -> String {
        if self.spans.is_empty() {
            self.text.clone()
        } else {
            self.spans.iter().map(|s| s.text.as_str()).collect()
        }
    }

    /// Re-encode the run for a PDF renderer that only knows the symbol
    /// font by its code points. Returns the family the run now depends on.
    fn remap_for_pdf(&mut self, load_symbol_ttf: bool) -> Option<&'static str> {
        self.restore();

        if let Some(source) = &self.source {
            let family = match (load_symbol_ttf, source.font) {
                (true, font) => font.family(),
                (false, SymbolFont::Wingdings) => "zapfdingbats",
                (false, SymbolFont::Symbol) => "symbol",
            };
            self.saved = Some(SavedRun {
                text: std::mem::replace(&mut self.text, source.text.clone()),
                family: self.font.family.replace(family.to_string()),
            });
            return Some(family);
        }

        if self.text.is_empty() {
            return None;
        }

        let family = if load_symbol_ttf { SYMBOL_FAMILY } else { "symbol" };
        let mut spans = Vec::new();
        let mut plain = String::new();
        for c in self.text.chars() {
            let code = remap_symbol_ttf_code(c as u32);
            match char::from_u32(code) {
                Some(mapped) if code != c as u32 => {
                    if !plain.is_empty() {
                        spans.push(SpanPiece {
                            text: std::mem::take(&mut plain),
                            family: None,
                        });
                    }
                    spans.push(SpanPiece {
                        text: format!("{mapped} "),
                        family: Some(family),
                    });
                }
                _ => plain.push(c),
            }
        }
        if spans.is_empty() {
            return None;
        }
        if !plain.is_empty() {
            spans.push(SpanPiece {
                text: plain,
                family: None,
            });
        }

        self.saved = Some(SavedRun {
            text: self.text.clone(),
            family: self.font.family.clone(),
        });
        self.spans = spans;
        Some(SYMBOL_FAMILY)
    }

    fn restore(&mut self) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };
        self.text = saved.text;
        self.font.family = saved.family;
        self.spans.clear();
        true
    }
}

impl Primitive for TextNode {
    fn offset(&self) -> Option<DVec2> {
        self.offset
    }

    fn set_offset(&mut self, offset: DVec2) {
        self.offset = Some(offset);
    }

    fn font_mut(&mut self) -> Option<&mut FontSpec> {
        Some(&mut self.font)
    }

    fn font(&self) -> Option<&FontSpec> {
        Some(&self.font)
    }

    fn to_svg(&self, _children: Vec<SvgNode>) -> SvgNode {
        let spans = self
            .spans
            .iter()
            .map(|piece| match piece.family {
                Some(family) => TSpan {
                    font_family: Some(family.to_string()),
                    font_weight: Some("normal".to_string()),
                    font_style: Some("normal".to_string()),
                    content: piece.text.clone(),
                },
                None => TSpan {
                    content: piece.text.clone(),
                    ..Default::default()
                },
            })
            .collect::<Vec<_>>();
        let content = if spans.is_empty() {
            self.text.clone()
        } else {
            String::new()
        };

        SvgNode::Text(Text {
            x: self.x,
            y: self.y,
            transform: transform_attr(self.offset),
            fill: self.fill.clone(),
            font_size: Some(self.font_size),
            font_family: self.font.family.clone(),
            font_weight: self.font.weight.clone(),
            font_style: self.font.style.clone(),
            text_decoration: self.decoration.map(|d| d.as_css().to_string()),
            spans,
            content,
        })
    }
}

/// Vector path (`<path>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathNode {
    pub d: String,
    pub style: PathStyle,
    pub offset: Option<DVec2>,
}

impl Primitive for PathNode {
    fn offset(&self) -> Option<DVec2> {
        self.offset
    }

    fn set_offset(&mut self, offset: DVec2) {
        self.offset = Some(offset);
    }

    fn to_svg(&self, _children: Vec<SvgNode>) -> SvgNode {
        let style = self.style.to_css();
        SvgNode::Path(Path {
            d: Some(self.d.clone()),
            transform: transform_attr(self.offset),
            style: (!style.is_empty()).then_some(style),
        })
    }
}

/// Any primitive stored in the canvas
#[enum_dispatch(Primitive)]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasNode {
    Group(GroupNode),
    Link(LinkNode),
    Text(TextNode),
    Path(PathNode),
}

#[derive(Debug, Clone)]
struct Slot {
    node: CanvasNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed SVG output sink
pub struct SvgCanvas {
    slots: Vec<Slot>,
    measurer: Option<Box<dyn TextMeasurer>>,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SvgCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgCanvas")
            .field("nodes", &self.slots.len())
            .field("measurer", &self.measurer.is_some())
            .finish()
    }
}

impl SvgCanvas {
    /// An empty canvas without exact text metrics
    pub fn new() -> Self {
        SvgCanvas {
            slots: vec![Slot {
                node: GroupNode::default().into(),
                parent: None,
                children: Vec::new(),
            }],
            measurer: None,
        }
    }

    /// An empty canvas that measures text with `measurer`
    pub fn with_measurer(measurer: impl TextMeasurer + 'static) -> Self {
        let mut canvas = Self::new();
        canvas.measurer = Some(Box::new(measurer));
        canvas
    }

    /// The top-level container
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.slots.get(id.0).map(|slot| &slot.node)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots.get(id.0).map_or(&[], |slot| &slot.children)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|slot| slot.parent)
    }

    /// Attached nodes in document order, root excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Text runs in document order
    pub fn texts(&self) -> Vec<(NodeId, &TextNode)> {
        self.descendants(self.root())
            .into_iter()
            .filter_map(|id| match self.node(id) {
                Some(CanvasNode::Text(text)) => Some((id, text)),
                _ => None,
            })
            .collect()
    }

    /// Paths in document order
    pub fn paths(&self) -> Vec<(NodeId, &PathNode)> {
        self.descendants(self.root())
            .into_iter()
            .filter_map(|id| match self.node(id) {
                Some(CanvasNode::Path(path)) => Some((id, path)),
                _ => None,
            })
            .collect()
    }

    /// Links in document order
    pub fn links(&self) -> Vec<(NodeId, &LinkNode)> {
        self.descendants(self.root())
            .into_iter()
            .filter_map(|id| match self.node(id) {
                Some(CanvasNode::Link(link)) => Some((id, link)),
                _ => None,
            })
            .collect()
    }

    /// Sum of the translations of `id` and all its ancestors
    pub fn absolute_offset(&self, id: NodeId) -> DVec2 {
        let mut total = DVec2::ZERO;
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(offset) = self.node(node).and_then(|n| n.offset()) {
                total += offset;
            }
            current = self.parent(node);
        }
        total
    }

    /// Absolute position of a text run's anchor
    pub fn text_position(&self, id: NodeId) -> Option<DVec2> {
        let Some(CanvasNode::Text(text)) = self.node(id) else {
            return None;
        };
        let parent = self.parent(id).map_or(DVec2::ZERO, |p| self.absolute_offset(p));
        Some(parent + text.anchor())
    }

    /// Font of `id` after inheritance from its ancestors
    pub fn resolved_font(&self, id: NodeId) -> FontSpec {
        let mut spec = FontSpec::default();
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(font) = self.node(node).and_then(|n| n.font()) {
                spec.inherit(font);
            }
            current = self.parent(node);
        }
        spec
    }

    fn push(&mut self, parent: NodeId, node: CanvasNode) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(slot) = self.slots.get_mut(parent.0) {
            slot.children.push(id);
        }
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.node)
    }

    fn font_mut(&mut self, id: NodeId) -> Option<&mut FontSpec> {
        self.node_mut(id).and_then(|n| n.font_mut())
    }

    /// Re-encode every text run for a PDF renderer.
    ///
    /// Returns the symbol families the document now needs.
    pub fn remap_symbols_for_pdf(&mut self, load_symbol_ttf: bool) -> Vec<&'static str> {
        let mut families = Vec::new();
        for id in self.descendants(self.root()) {
            if let Some(CanvasNode::Text(text)) = self.node_mut(id) {
                if let Some(family) = text.remap_for_pdf(load_symbol_ttf) {
                    if !families.contains(&family) {
                        families.push(family);
                    }
                }
            }
        }
        families
    }

    /// Undo [`SvgCanvas::remap_symbols_for_pdf`]; returns the number of runs
    /// restored.
    pub fn restore_pdf_symbols(&mut self) -> usize {
        let mut restored = 0;
        for slot in &mut self.slots {
            if let CanvasNode::Text(text) = &mut slot.node {
                if text.restore() {
                    restored += 1;
                }
            }
        }
        restored
    }

    fn convert(&self, id: NodeId) -> Option<SvgNode> {
        let node = self.node(id)?;
        let children = self
            .children(id)
            .iter()
            .filter_map(|child| self.convert(*child))
            .collect();
        Some(node.to_svg(children))
    }

    /// Serialize the canvas as a standalone SVG document.
    ///
    /// With `rect` the document's view box covers exactly that area.
    pub fn to_svg_document(&self, rect: Option<&BoundingRect>) -> Result<String, miette::Report> {
        let mut svg = Svg {
            xmlns: Some(SVG_NS.to_string()),
            ..Default::default()
        };

        if let Some(r) = rect {
            svg.width = Some(fmt_num(r.width()));
            svg.height = Some(fmt_num(r.height()));
            svg.view_box = Some(format!(
                "{} {} {} {}",
                fmt_num(r.x1),
                fmt_num(r.y1),
                fmt_num(r.width()),
                fmt_num(r.height())
            ));
        }

        let root = self.root();
        let plain_root = matches!(
            self.node(root),
            Some(CanvasNode::Group(g)) if g.offset.is_none() && g.font == FontSpec::default()
        );
        svg.children = if plain_root {
            self.children(root)
                .iter()
                .filter_map(|child| self.convert(*child))
                .collect()
        } else {
            self.convert(root).into_iter().collect()
        };

        fn format_float(value: f64, writer: &mut dyn std::io::Write) -> Result<(), std::io::Error> {
            write!(writer, "{}", fmt_num(value))
        }

        let options = SerializeOptions {
            float_formatter: Some(format_float),
            preserve_entities: true,
            ..Default::default()
        };
        facet_xml::to_string_with_options(&svg, &options)
            .map_err(|e| miette::miette!("XML serialization error: {}", e))
    }
}

impl OutputSink for SvgCanvas {
    type Node = NodeId;

    fn append_group(&mut self, parent: NodeId) -> NodeId {
        self.push(parent, GroupNode::default().into())
    }

    fn append_link(&mut self, parent: NodeId, href: &str, title: Option<&str>) -> NodeId {
        let link = LinkNode {
            href: href.to_string(),
            title: title.map(str::to_string),
            offset: None,
        };
        self.push(parent, link.into())
    }

    fn append_text(&mut self, parent: NodeId, run: TextRun) -> NodeId {
        self.push(parent, TextNode::from_run(run).into())
    }

    fn append_path(&mut self, parent: NodeId, style: PathStyle) -> NodeId {
        let path = PathNode {
            d: String::new(),
            style,
            offset: None,
        };
        self.push(parent, path.into())
    }

    fn set_path_data(&mut self, path: NodeId, d: String) {
        if let Some(CanvasNode::Path(node)) = self.node_mut(path) {
            node.d = d;
        }
    }

    fn set_text_decoration(&mut self, node: NodeId, decoration: Decoration) {
        if let Some(CanvasNode::Text(text)) = self.node_mut(node) {
            text.decoration = Some(decoration);
        }
    }

    fn set_font_weight(&mut self, node: NodeId, weight: &str) {
        if let Some(font) = self.font_mut(node) {
            font.weight = Some(weight.to_string());
        }
    }

    fn set_font_style(&mut self, node: NodeId, style: &str) {
        if let Some(font) = self.font_mut(node) {
            font.style = Some(style.to_string());
        }
    }

    fn set_font(&mut self, node: NodeId, family: &str, weight: Option<&str>, style: Option<&str>) {
        if let Some(font) = self.font_mut(node) {
            font.family = Some(family.to_string());
            if let Some(weight) = weight {
                font.weight = Some(weight.to_string());
            }
            if let Some(style) = style {
                font.style = Some(style.to_string());
            }
        }
    }

    fn translate(&mut self, node: NodeId, x: f64, y: f64) {
        if let Some(n) = self.node_mut(node) {
            n.set_offset(dvec2(x, y));
        }
    }

    fn measure_text(&self, node: NodeId) -> Option<TextExtent> {
        let measurer = self.measurer.as_ref()?;
        let Some(CanvasNode::Text(text)) = self.node(node) else {
            return None;
        };
        measurer.measure(&TextStyle {
            text: &text.text,
            font_size: text.font_size,
            font: self.resolved_font(node),
        })
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root() {
            return;
        }
        if let Some(parent) = self.parent(node) {
            if let Some(slot) = self.slots.get_mut(parent.0) {
                slot.children.retain(|c| *c != node);
            }
        }
        if let Some(slot) = self.slots.get_mut(node.0) {
            slot.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_size: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn nodes_attach_in_order() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let g = canvas.append_group(root);
        let a = canvas.append_text(g, run("a"));
        let b = canvas.append_text(root, run("b"));
        assert_eq!(canvas.children(root), &[g, b]);
        assert_eq!(canvas.parent(a), Some(g));
        let order: Vec<_> = canvas.texts().into_iter().map(|(_, t)| t.text.clone()).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn translate_replaces_and_accumulates_through_parents() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let g = canvas.append_group(root);
        canvas.translate(g, 5.0, 5.0);
        canvas.translate(g, 10.0, -4.0);
        let t = canvas.append_text(
            g,
            TextRun {
                x: Some(3.0),
                ..run("x")
            },
        );
        assert_eq!(canvas.absolute_offset(g), dvec2(10.0, -4.0));
        assert_eq!(canvas.text_position(t), Some(dvec2(13.0, -4.0)));
    }

    #[test]
    fn removed_subtree_disappears() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let g = canvas.append_group(root);
        canvas.append_text(g, run("gone"));
        canvas.remove(g);
        assert!(canvas.texts().is_empty());
        assert!(canvas.children(root).is_empty());
    }

    #[test]
    fn fonts_are_inherited() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let g = canvas.append_group(root);
        canvas.set_font(g, "Courier New", Some("bold"), None);
        let t = canvas.append_text(g, run("x"));
        canvas.set_font_style(t, "italic");
        let font = canvas.resolved_font(t);
        assert_eq!(font.family.as_deref(), Some("Courier New"));
        assert_eq!(font.weight.as_deref(), Some("bold"));
        assert_eq!(font.style.as_deref(), Some("italic"));
    }

    fn wide_bold(style: &TextStyle<'_>) -> Option<TextExtent> {
        let width = style.text.len() as f64 * style.font_size * 0.5;
        let bold = style.font.weight.as_deref() == Some("bold");
        Some(TextExtent {
            width: if bold { width * 2.0 } else { width },
            height: style.font_size,
        })
    }

    #[test]
    fn measurer_sees_resolved_font() {
        let mut canvas = SvgCanvas::with_measurer(wide_bold);
        let root = canvas.root();
        canvas.set_font_weight(root, "bold");
        let t = canvas.append_text(root, run("ab"));
        assert_eq!(
            canvas.measure_text(t),
            Some(TextExtent {
                width: 40.0,
                height: 20.0
            })
        );
        assert_eq!(SvgCanvas::new().measure_text(t), None);
    }

    #[test]
    fn pdf_remap_splits_greek_and_restores() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let t = canvas.append_text(root, run("x\u{3b1}y"));
        let families = canvas.remap_symbols_for_pdf(false);
        assert_eq!(families, [SYMBOL_FAMILY]);

        let Some(CanvasNode::Text(text)) = canvas.node(t) else {
            panic!("not a text node");
        };
        assert_eq!(
            text.spans,
            vec![
                SpanPiece {
                    text: "x".into(),
                    family: None
                },
                SpanPiece {
                    text: "a ".into(),
                    family: Some("symbol")
                },
                SpanPiece {
                    text: "y".into(),
                    family: None
                },
            ]
        );

        assert_eq!(canvas.restore_pdf_symbols(), 1);
        let Some(CanvasNode::Text(text)) = canvas.node(t) else {
            panic!("not a text node");
        };
        assert!(text.spans.is_empty());
        assert_eq!(text.text, "x\u{3b1}y");
    }

    #[test]
    fn pdf_remap_restores_symbol_font_source() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        let t = canvas.append_text(
            root,
            TextRun {
                source: Some(SymbolSource {
                    text: "a".into(),
                    font: SymbolFont::Wingdings,
                }),
                ..run("\u{1F589}")
            },
        );
        assert_eq!(canvas.remap_symbols_for_pdf(false), ["zapfdingbats"]);
        assert_eq!(canvas.resolved_font(t).family.as_deref(), Some("zapfdingbats"));
        assert_eq!(canvas.remap_symbols_for_pdf(true).len(), 1);
        canvas.restore_pdf_symbols();
        assert_eq!(canvas.resolved_font(t).family, None);
    }

    #[test]
    fn plain_runs_are_left_alone() {
        let mut canvas = SvgCanvas::new();
        let root = canvas.root();
        canvas.append_text(root, run("abc"));
        assert!(canvas.remap_symbols_for_pdf(true).is_empty());
        assert_eq!(canvas.restore_pdf_symbols(), 0);
    }
}
