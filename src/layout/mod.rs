//! Recursive layout of TLatex markup into positioned primitives.
//!
//! The engine walks the markup left to right. Text up to the earliest
//! directive becomes one text run; the directive's arguments are laid out
//! recursively at their own nesting level, then positioned inside the
//! current level and joined with vector paths (fraction bars, radicals,
//! brackets, accents). Every level tracks the rectangle it occupies so its
//! parent can place it.

pub mod context;
pub mod extract;
pub mod path;
pub mod rect;

pub use context::{Frame, Level};
pub use path::{PathData, fmt_num, round};
pub use rect::BoundingRect;

use glam::dvec2;

use crate::args::{self, Argument};
use crate::errors::LayoutError;
use crate::fallback::replace_symbols;
use crate::font::{StyleProvider, SymbolFont, SYMBOL_FAMILY, TIMES_FAMILY};
use crate::grammar::{
    Accent, Axis, BigOperator, Bracket, Decoration, Feature, FeatureKind, StyleToggle,
    find_earliest,
};
use crate::log::{debug, warn};
use crate::metrics::approximate_label_width;
use crate::options::{RenderOptions, TextArgs};
use crate::sink::{OutputSink, PathStyle, SymbolSource, TextRun};
use crate::symbols::translate_latex;

use extract::{Opening, Scripts};

/// Vertical offset of the fraction bar relative to the baseline, in font sizes
const STACK_AXIS: f64 = -0.35;
/// Advance of one space, in font sizes
const SPACE_WIDTH: f64 = 0.4;
/// Scale of sub- and superscripts
const SCRIPT_SCALE: f64 = 0.6;

/// Letters drawn without ascenders or with a dot, which need less accent room
const TALL_LOWERCASE: &str = "tdbfhkli";

/// Lays out markup into an [`OutputSink`].
pub struct LayoutEngine<'a, S: OutputSink, P: StyleProvider + ?Sized> {
    sink: &'a mut S,
    styles: &'a P,
    options: RenderOptions,
    /// Color of runs whose markup sets none
    color: Option<String>,
    /// Ask the sink for exact text extents
    exact: bool,
}

impl<'a, S: OutputSink, P: StyleProvider + ?Sized> LayoutEngine<'a, S, P> {
    pub fn new(sink: &'a mut S, styles: &'a P, options: RenderOptions, args: &TextArgs) -> Self {
        LayoutEngine {
            sink,
            styles,
            options,
            color: args.color.clone(),
            exact: !options.approx_text_size && !args.fast,
        }
    }

    /// Lay out `args.text` directly into `node`.
    ///
    /// The occupied rectangle is stored in `args.text_rect`, also when the
    /// markup turns out to be malformed part way through.
    pub fn layout(&mut self, node: S::Node, args: &mut TextArgs) -> Result<(), LayoutError> {
        let frame = Frame::root(args.font.clone(), args.font_size);
        let mut level = Level::new(Some(node));
        let text = args.text.clone();

        let result = self.parse(node, &text, &frame, &mut level);
        args.text_rect = level.rect;
        result
    }

    /// Lay out one nesting level.
    ///
    /// `node` is where a level container is created on demand; primitives of
    /// this level end up in `curr.group`.
    pub fn parse(
        &mut self,
        node: S::Node,
        label: &str,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let mut label = label;
        let mut elements = 0usize;

        while !label.is_empty() {
            let found = find_earliest(label);
            let best = found.map_or(label.len(), |(pos, _)| pos);

            if best > 0 {
                let alone = found.is_none() && elements == 0;
                elements += 1;
                self.emit_text(node, &label[..best], alone, frame, curr);
            }

            let Some((pos, feature)) = found else {
                return Ok(());
            };

            // scripts keep their opening brace for the extractor
            let skip = match feature.kind {
                FeatureKind::Script(_) => feature.name.len() - 1,
                _ => feature.name.len(),
            };
            label = &label[pos + skip..];
            elements += 1;

            debug!(depth = frame.level, directive = feature.name, x = curr.x, "directive");

            self.dispatch(node, &mut label, feature, elements, frame, curr)?;
        }

        Ok(())
    }

    fn dispatch(
        &mut self,
        node: S::Node,
        label: &mut &str,
        feature: &'static Feature,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        match feature.kind {
            FeatureKind::Accent(accent) => self.accent(node, label, accent, elements, frame, curr),
            FeatureKind::TwoLines { divider, middle } => {
                self.two_lines(node, label, divider, middle, elements, frame, curr)
            }
            FeatureKind::Script(script) => {
                let subs = extract::scripts(label, Some(script), feature.name)?;
                self.scripts(node, &subs, frame, curr)
            }
            FeatureKind::BigOperator(op) => {
                let subs = extract::scripts(label, None, feature.name).unwrap_or_else(|_| {
                    warn!(directive = feature.name, "ignoring malformed limits");
                    Scripts::default()
                });
                self.big_operator(node, label, op, &subs, elements, frame, curr)
            }
            FeatureKind::Brackets { bracket, right } => {
                self.brackets(node, label, bracket, feature.name, right, elements, frame, curr)
            }
            FeatureKind::Decorate(decoration) => {
                self.decorate(node, label, decoration, elements, frame, curr)
            }
            FeatureKind::Style(toggle) => {
                let sub_label = extract::braced(label, Opening::Consumed)?;
                let sub_frame = match toggle {
                    StyleToggle::Bold => frame.child(1.0).with_bold(!frame.bold.unwrap_or(false)),
                    StyleToggle::Italic => {
                        frame.child(1.0).with_italic(!frame.italic.unwrap_or(false))
                    }
                };
                self.splice(node, &sub_label, &sub_frame, curr)
            }
            FeatureKind::Shift(axis) => {
                let value = args::bracketed(label, feature)?.as_f64();
                self.shift(node, label, axis, value, frame, curr)
            }
            FeatureKind::Url => {
                let href = match args::bracketed(label, feature)? {
                    Argument::Text(href) => href,
                    _ => "",
                };
                self.link(node, label, href, frame, curr)
            }
            FeatureKind::Color => {
                let index = args::bracketed(label, feature)?.as_index();
                let sub_label = extract::braced(label, Opening::Consumed)?;
                let sub_frame = frame.child(1.0).with_color(self.styles.color(index));
                self.splice(node, &sub_label, &sub_frame, curr)
            }
            FeatureKind::Scale => {
                let factor = args::bracketed(label, feature)?.as_f64();
                let sub_label = extract::braced(label, Opening::Consumed)?;
                self.splice(node, &sub_label, &frame.child(1.0).with_scale(factor), curr)
            }
            FeatureKind::Font => {
                let index = args::bracketed(label, feature)?.as_index();
                let sub_label = extract::braced(label, Opening::Consumed)?;
                let mut font = self.styles.font(index, frame.font_size);
                // embedded symbol faces do not survive, draw through the remap
                if font.name == SYMBOL_FAMILY && font.symbol.is_none() {
                    font.symbol = Some(SymbolFont::Symbol);
                    font.name = TIMES_FAMILY.to_string();
                }
                font.use_full_style = true;
                self.splice(node, &sub_label, &frame.child(1.0).with_font(font), curr)
            }
            FeatureKind::Sqrt => {
                let index = match feature.arg {
                    Some(_) => Some(args::bracketed(label, feature)?.as_index()),
                    None => None,
                };
                self.sqrt(node, label, index, elements, frame, curr)
            }
        }
    }

    // ------------------------------------------------------------------
    // Level helpers
    // ------------------------------------------------------------------

    /// Container of the current level, created on first use.
    fn current_group(&mut self, node: S::Node, curr: &mut Level<S::Node>) -> S::Node {
        match curr.group {
            Some(group) => group,
            None => {
                let group = self.sink.append_group(node);
                curr.group = Some(group);
                group
            }
        }
    }

    /// Container for a compound construct placed at the cursor.
    ///
    /// When the construct is the only thing at an untouched level, the level
    /// container itself is reused.
    fn create_gg(
        &mut self,
        node: S::Node,
        curr: &mut Level<S::Node>,
        elements: usize,
        rest_empty: bool,
        link: Option<(&str, Option<&str>)>,
    ) -> S::Node {
        let gg = self.current_group(node, curr);

        let Some((href, title)) = link else {
            if elements == 1 && rest_empty && curr.x == 0.0 && curr.y == 0.0 {
                return gg;
            }
            let group = self.sink.append_group(gg);
            self.sink.translate(group, curr.x, curr.y);
            return group;
        };

        let anchor = self.sink.append_link(gg, href, title);
        self.sink.translate(anchor, curr.x, curr.y);
        anchor
    }

    fn create_path(&mut self, parent: S::Node, frame: &Frame, filled: bool) -> S::Node {
        let color = frame.color.clone().or_else(|| self.color.clone());
        let style = if filled {
            PathStyle {
                stroke: Some("none".to_string()),
                stroke_width: None,
                fill: color,
            }
        } else {
            let factor = if frame.font.bold { 0.1 } else { 0.07 };
            PathStyle {
                stroke: color,
                stroke_width: Some(round(frame.font_size * factor).max(1.0)),
                fill: Some("none".to_string()),
            }
        };
        self.sink.append_path(parent, style)
    }

    fn draw_path(&mut self, parent: S::Node, frame: &Frame, filled: bool, data: PathData) {
        let path = self.create_path(parent, frame, filled);
        self.sink.set_path_data(path, data.build());
    }

    fn add_spaces(&self, frame: &Frame, curr: &mut Level<S::Node>, count: usize) {
        let dx = count as f64 * frame.font_size * SPACE_WIDTH;
        curr.extend(curr.x, curr.y, curr.x + dx, curr.y);
        curr.shift_x(dx);
    }

    /// Move a laid-out sub-level to `(x, y)` and merge its area.
    ///
    /// With `inside` the offset is relative to a container already placed at
    /// the cursor; otherwise it is relative to the level origin.
    fn position(
        &mut self,
        curr: &mut Level<S::Node>,
        sub: &mut Level<S::Node>,
        x: f64,
        y: f64,
        inside: bool,
    ) {
        let (x, y) = (round(x), round(y));
        if let Some(group) = sub.group {
            self.sink.translate(group, x, y);
        }

        let mut r = sub.area();
        r.shift(dvec2(x, y));
        sub.rect = Some(r);

        if inside {
            curr.extend(curr.x + r.x1, curr.y + r.y1, curr.x + r.x2, curr.y + r.y2);
        } else {
            curr.extend(r.x1, r.y1, r.x2, r.y2);
        }
    }

    /// Lay out `label` at a fresh nesting level inside `parent`.
    fn sub_level(
        &mut self,
        parent: S::Node,
        label: &str,
        frame: &Frame,
        decoration: Option<Decoration>,
    ) -> Result<Level<S::Node>, LayoutError> {
        let mut level = Level::new(None);
        level.decoration = decoration;
        self.parse(parent, label, frame, &mut level)?;
        Ok(level)
    }

    /// Lay out a restyled argument at the cursor and advance past it.
    fn splice(
        &mut self,
        node: S::Node,
        sub_label: &str,
        sub_frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let parent = self.current_group(node, curr);
        let mut sub = self.sub_level(parent, sub_label, sub_frame, None)?;
        let (x, y) = (curr.x, curr.y);
        self.position(curr, &mut sub, x, y, false);
        curr.shift_x(sub.area().width());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Text runs
    // ------------------------------------------------------------------

    fn emit_text(
        &mut self,
        node: S::Node,
        raw: &str,
        alone: bool,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) {
        let translated = translate_latex(raw);

        let trimmed = translated.trim_start_matches(' ');
        let leading = translated.len() - trimmed.len();
        if leading > 0 {
            self.add_spaces(frame, curr, leading);
        }
        let text = trimmed.trim_end_matches(' ');
        let trailing = trimmed.len() - text.len();

        if text.is_empty() && !alone {
            self.add_spaces(frame, curr, trailing);
            return;
        }

        let parent = match curr.group {
            Some(group) => group,
            None if alone => node,
            None => self.current_group(node, curr),
        };

        let (content, source) = match frame.font.symbol {
            Some(font) => (
                replace_symbols(text, font),
                Some(SymbolSource {
                    text: text.to_string(),
                    font,
                }),
            ),
            None => (text.to_string(), None),
        };

        let run = TextRun {
            text: content,
            x: (curr.x != 0.0).then_some(curr.x),
            y: (curr.y != 0.0).then_some(curr.y),
            fill: frame.color.clone().or_else(|| self.color.clone()),
            font_size: round(frame.font_size).max(1.0),
            source,
        };
        let elem = self.sink.append_text(parent, run);
        let target = *curr.group.get_or_insert(elem);

        if frame.custom_font {
            frame.font.apply(self.sink, target);
        }
        if let Some(bold) = frame.bold {
            self.sink
                .set_font_weight(target, if bold { "bold" } else { "normal" });
        }
        if let Some(italic) = frame.italic {
            self.sink
                .set_font_style(target, if italic { "italic" } else { "normal" });
        }

        let measured = if self.exact {
            self.sink.measure_text(elem)
        } else {
            None
        };
        let (width, height) = match measured {
            Some(extent) => (extent.width, extent.height),
            None => (
                approximate_label_width(text, &frame.font, Some(frame.font_size)),
                frame.font_size * 1.2,
            ),
        };

        let narrow = text.encode_utf16().count() == 1
            && !frame.font.is_monospace()
            && text.chars().all(|c| "lfij".contains(c));
        let xgap = if narrow { 0.1 * frame.font_size } else { 0.0 };

        curr.extend(
            curr.x,
            curr.y - height * 0.8,
            curr.x + width,
            curr.y + height * 0.2,
        );

        if !alone {
            curr.shift_x(width + xgap);
            self.add_spaces(frame, curr, trailing);
            curr.xgap = 0.0;
        } else if let Some(decoration) = curr.decoration.take() {
            self.sink.set_text_decoration(elem, decoration);
        } else {
            curr.xgap = xgap;
        }
    }

    // ------------------------------------------------------------------
    // Directives
    // ------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn accent(
        &mut self,
        node: S::Node,
        label: &mut &str,
        accent: Accent,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let sub_label = extract::braced(label, Opening::Consumed)?;
        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);
        // lowercase without ascender sits lowest, any other single glyph a bit higher
        let reduce = accent_reduce(&sub_label);

        let mut sub = self.sub_level(gg, &sub_label, &frame.child(1.0), None)?;
        let r = sub.area();

        let fs = frame.font_size;
        let min_width = fs * 0.6;
        let y1 = round(r.y1 * reduce);
        let dy2 = round(fs * 0.1);
        let dy = dy2 * 2.0;

        let mut w = r.width();
        let mut xpos = 0.0;
        if accent.needs_min_width() && w < min_width {
            w = min_width;
            xpos = (min_width - r.width()) / 2.0;
        }

        let w5 = round(w * 0.5);
        let w3 = round(w * 0.3);
        let w2 = w5 - w3;
        let w8 = w5 + w3;
        let w = w5 * 2.0;

        self.position(curr, &mut sub, xpos, 0.0, true);

        let dot = |d: PathData| {
            d.arc_by(dy2, dy2, false, true, dy, 0.0)
                .arc_by(dy2, dy2, false, true, -dy, 0.0)
                .close()
        };

        let (data, filled) = match accent {
            Accent::Check => (
                PathData::new()
                    .move_to(w2, y1 - dy)
                    .line_to(w5, y1)
                    .line_to(w8, y1 - dy),
                false,
            ),
            Accent::Acute => (PathData::new().move_to(w5, y1).line_by(dy, -dy), false),
            Accent::Grave => (PathData::new().move_to(w5, y1).line_by(-dy, -dy), false),
            Accent::Dot => (dot(PathData::new().move_to(w5 - dy2, y1)), true),
            Accent::DoubleDot => {
                let first = dot(PathData::new().move_to(w5 - 3.0 * dy2, y1));
                (dot(first.space().move_to(w5 + dy2, y1)), true)
            }
            Accent::Tilde => (
                PathData::new()
                    .move_to(w2, y1)
                    .space()
                    .arc_by(w3, dy, false, true, w3, 0.0)
                    .space()
                    .arc_by(w3, dy, false, false, w3, 0.0),
                false,
            ),
            Accent::Slash => (
                PathData::new().move_to(w, y1).line_to(0.0, round(r.y2)),
                false,
            ),
            Accent::Vec => (
                PathData::new()
                    .move_to(w2, y1)
                    .horizontal_to(w8)
                    .move_to(w8 - dy, y1 - dy)
                    .line_by(dy, dy)
                    .line_by(-dy, dy),
                false,
            ),
            Accent::Hat => (
                PathData::new()
                    .move_to(w2, y1)
                    .line_to(w5, y1 - dy)
                    .line_to(w8, y1),
                false,
            ),
        };
        self.draw_path(gg, frame, filled, data);

        curr.shift_x(r.width() + sub.xgap);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn two_lines(
        &mut self,
        node: S::Node,
        label: &mut &str,
        divider: bool,
        middle: bool,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let line1 = extract::braced(label, Opening::Consumed)?;
        let line2 = extract::braced(label, Opening::Required)?;

        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);
        let scale = if frame.in_stack { 0.7 } else { 1.0 };
        let line_frame = frame.child(scale).stacked();

        let mut sub1 = self.sub_level(gg, &line1, &line_frame, None)?;
        let bar = divider.then(|| self.create_path(gg, frame, false));
        let mut sub2 = self.sub_level(gg, &line2, &line_frame, None)?;

        let (r1, r2) = (sub1.area(), sub2.area());
        let w = r1.width().max(r2.width());
        let dw = r1.width() - r2.width();
        let dy = frame.font_size * STACK_AXIS;

        let x1 = if middle && dw < 0.0 { -dw / 2.0 } else { 0.0 };
        self.position(curr, &mut sub1, x1, dy - r1.y2, true);
        let x2 = if middle && dw > 0.0 { dw / 2.0 } else { 0.0 };
        self.position(curr, &mut sub2, x2, dy - r2.y1, true);

        if let Some(bar) = bar {
            let data = PathData::new()
                .move_to(0.0, round(dy))
                .horizontal_by(round(w - frame.font_size * 0.1));
            self.sink.set_path_data(bar, data.build());
        }

        curr.shift_x(w);
        Ok(())
    }

    fn scripts(
        &mut self,
        node: S::Node,
        subs: &Scripts<'_>,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let fs = frame.font_size;
        let x = curr.x;
        let dx = 0.03 * fs;
        let ylow = 0.25 * fs;
        let mut yup = -fs;

        let script_frame = frame.child(SCRIPT_SCALE);
        let mut up = match subs.up() {
            Some(text) => {
                let parent = self.current_group(node, curr);
                Some(self.sub_level(parent, text, &script_frame, None)?)
            }
            None => None,
        };
        let mut low = match subs.low() {
            Some(text) => {
                let parent = self.current_group(node, curr);
                Some(self.sub_level(parent, text, &script_frame, None)?)
            }
            None => None,
        };

        let (mut w1, mut w2) = (0.0_f64, 0.0_f64);

        if let Some(up) = up.as_mut() {
            if low.is_none() {
                if let Some(rect) = curr.rect {
                    yup = yup.min(rect.last_y1);
                }
            }
            let r = up.area();
            self.position(curr, up, x + dx, yup - r.y1 - fs * 0.1, false);
            w1 = r.width();
        }

        if let Some(low) = low.as_mut() {
            let r = low.area();
            self.position(curr, low, x + dx, ylow - r.y2 + fs * 0.1, false);
            w2 = r.width();
        }

        curr.shift_x(dx + w1.max(w2));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn big_operator(
        &mut self,
        node: S::Node,
        label: &mut &str,
        op: BigOperator,
        subs: &Scripts<'_>,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);
        let path = self.create_path(gg, frame, false);

        let fs = frame.font_size;
        let h = round(fs * 1.7);
        let w = round(fs);
        let r = round(h * 0.1);

        let (x_up, x_low, data) = match op {
            BigOperator::Sum => (
                w / 2.0,
                w / 2.0,
                PathData::new()
                    .move_to(w, round(-0.75 * h))
                    .horizontal_by(-w)
                    .line_by(round(0.4 * w), round(0.3 * h))
                    .line_by(round(-0.4 * w), round(0.7 * h))
                    .horizontal_by(w),
            ),
            BigOperator::Integral => (
                3.0 * r,
                r,
                PathData::new()
                    .move_to(0.0, round(0.25 * h - r))
                    .arc_by(r, r, false, false, 2.0 * r, 0.0)
                    .vertical_by(2.0 * r - h)
                    .arc_by(r, r, true, true, 2.0 * r, 0.0),
            ),
        };
        self.sink.set_path_data(path, data.build());

        curr.extend(curr.x, curr.y - 0.6 * h, curr.x + w, curr.y + 0.4 * h);

        let limit_frame = frame.child(SCRIPT_SCALE);
        if let Some(text) = subs.low() {
            let mut sub = self.sub_level(gg, text, &limit_frame, None)?;
            let r = sub.area();
            self.position(curr, &mut sub, x_low - r.width() / 2.0, 0.25 * h - r.y1, true);
        }
        if let Some(text) = subs.up() {
            let mut sub = self.sub_level(gg, text, &limit_frame, None)?;
            let r = sub.area();
            self.position(curr, &mut sub, x_up - r.width() / 2.0, -0.75 * h - r.y2, true);
        }

        curr.shift_x(w);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn brackets(
        &mut self,
        node: S::Node,
        label: &mut &str,
        bracket: Bracket,
        name: &'static str,
        right: Option<&'static str>,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let (open, close) = match right {
            Some(close) => (name, close),
            None => ("{", "}"),
        };
        let sub_label = extract::delimited(label, Opening::Consumed, open, close)?;

        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);
        let left_path = self.create_path(gg, frame, false);
        let mut sub = self.sub_level(gg, &sub_label, &frame.child(1.0), None)?;
        let right_path = self.create_path(gg, frame, false);

        let w = round(frame.font_size * 0.2).max(2.0);
        let r = sub.area();
        let dy = round(r.y2 - r.y1);
        let y1 = round(r.y1);
        let rw = round(r.width());

        let (left, right) = match bracket {
            Bracket::Bar => (
                PathData::new().move_to(w, y1).vertical_by(dy),
                PathData::new().move_to(3.0 * w + rw, y1).vertical_by(dy),
            ),
            Bracket::Square => (
                PathData::new()
                    .move_to(2.0 * w, y1)
                    .horizontal_by(-w)
                    .vertical_by(dy)
                    .horizontal_by(w),
                PathData::new()
                    .move_to(2.0 * w + rw, y1)
                    .horizontal_by(w)
                    .vertical_by(dy)
                    .horizontal_by(-w),
            ),
            Bracket::Curly => {
                let straight = dy / 2.0 - 2.0 * w;
                (
                    PathData::new()
                        .move_to(2.0 * w, y1)
                        .arc_by(w, w, false, false, -w, w)
                        .vertical_by(straight)
                        .arc_by(w, w, false, true, -w, w)
                        .arc_by(w, w, false, true, w, w)
                        .vertical_by(straight)
                        .arc_by(w, w, false, false, w, w),
                    PathData::new()
                        .move_to(2.0 * w + rw, y1)
                        .arc_by(w, w, false, true, w, w)
                        .vertical_by(straight)
                        .arc_by(w, w, false, false, w, w)
                        .arc_by(w, w, false, false, -w, w)
                        .vertical_by(straight)
                        .arc_by(w, w, false, true, -w, w),
                )
            }
            Bracket::Round => (
                PathData::new()
                    .move_to(w, y1)
                    .arc_by(4.0 * dy, 4.0 * dy, false, false, 0.0, dy),
                PathData::new()
                    .move_to(3.0 * w + rw, y1)
                    .arc_by(4.0 * dy, 4.0 * dy, false, true, 0.0, dy),
            ),
        };
        self.sink.set_path_data(left_path, left.build());
        self.sink.set_path_data(right_path, right.build());

        self.position(curr, &mut sub, 2.0 * w, 0.0, true);
        curr.extend(
            curr.x,
            curr.y + r.y1,
            curr.x + 4.0 * w + r.width(),
            curr.y + r.y2,
        );
        curr.shift_x(4.0 * w + r.width());
        Ok(())
    }

    fn decorate(
        &mut self,
        node: S::Node,
        label: &mut &str,
        decoration: Decoration,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let sub_label = extract::braced(label, Opening::Consumed)?;
        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);
        let mut sub = self.sub_level(gg, &sub_label, &frame.child(1.0), Some(decoration))?;
        let r = sub.area();

        // still pending: the argument was not a lone run that took it
        if let Some(decoration) = sub.decoration {
            let y = match decoration {
                Decoration::Underline => r.y2,
                Decoration::Overline => r.y1,
                Decoration::LineThrough => 0.45 * r.y1 + 0.55 * r.y2,
            };
            let data = PathData::new()
                .move_to(0.0, round(y))
                .horizontal_by(round(r.width()));
            self.draw_path(gg, frame, false, data);
        }

        self.position(curr, &mut sub, 0.0, 0.0, true);
        curr.shift_x(r.width());
        Ok(())
    }

    fn shift(
        &mut self,
        node: S::Node,
        label: &mut &str,
        axis: Axis,
        value: f64,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let sub_label = extract::braced(label, Opening::Consumed)?;
        let parent = self.current_group(node, curr);
        let mut sub = self.sub_level(parent, &sub_label, &frame.child(1.0), None)?;
        let r = sub.area();

        let (shift_x, shift_y) = match axis {
            Axis::X => (value * r.width(), 0.0),
            Axis::Y => (0.0, value * r.height()),
        };
        let (x, y) = (curr.x + shift_x, curr.y + shift_y);
        self.position(curr, &mut sub, x, y, false);

        let advance = if shift_x > 0.0 { 1.0 + value } else { 1.0 };
        curr.shift_x(r.width() * advance);
        Ok(())
    }

    fn link(
        &mut self,
        node: S::Node,
        label: &mut &str,
        href: &str,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let sub_label = extract::braced(label, Opening::Consumed)?;
        let title = (!self.options.batch_mode).then(|| format!("link on {href}"));
        let gg = self.create_gg(node, curr, 1, false, Some((href, title.as_deref())));

        let mut sub = self.sub_level(gg, &sub_label, &frame.child(1.0), None)?;
        self.position(curr, &mut sub, 0.0, 0.0, true);
        curr.shift_x(sub.area().width());
        Ok(())
    }

    fn sqrt(
        &mut self,
        node: S::Node,
        label: &mut &str,
        index: Option<i32>,
        elements: usize,
        frame: &Frame,
        curr: &mut Level<S::Node>,
    ) -> Result<(), LayoutError> {
        let sub_label = extract::braced(label, Opening::Consumed)?;
        let gg = self.create_gg(node, curr, elements, label.is_empty(), None);

        let index_frame = frame.child(0.7);
        let index_level = match index {
            Some(n) => Some(self.sub_level(gg, &n.to_string(), &index_frame, None)?),
            None => None,
        };

        let path = self.create_path(gg, frame, false);
        let mut sub = self.sub_level(gg, &sub_label, &frame.child(1.0), None)?;

        let r = sub.area();
        let h = round(r.height());
        let h1 = round(r.height() * 0.1);
        let w = round(r.width());
        let midy = round((r.y1 + r.y2) / 2.0);
        let f2 = round(frame.font_size * 0.2);
        let y2 = round(r.y2);

        if let Some(mut index_level) = index_level {
            let y = midy - index_frame.font_size * 0.3;
            self.position(curr, &mut index_level, 0.0, y, true);
        }

        let data = PathData::new()
            .move_to(0.0, midy)
            .horizontal_by(h1)
            .line_by(h1, y2 - midy - f2)
            .line_by(h1, -h + f2)
            .horizontal_by(round(h * 0.2 + w))
            .vertical_by(h1);
        self.sink.set_path_data(path, data.build());

        self.position(curr, &mut sub, h * 0.4, 0.0, true);
        curr.extend(
            curr.x,
            curr.y + r.y1 - frame.font_size * 0.1,
            curr.x + w + h * 0.6,
            curr.y + r.y2,
        );
        curr.shift_x(w + h * 0.6);
        Ok(())
    }
}

/// Vertical scale applied to the top edge of an accent's argument.
///
/// Single lowercase letters without ascenders sit lowest, other single
/// characters a little higher; longer arguments use their full height.
fn accent_reduce(sub_label: &str) -> f64 {
    let mut units = sub_label.encode_utf16();
    match (units.next(), units.next()) {
        (Some(_), None) => {
            let c = sub_label.chars().next().unwrap_or(' ');
            if c.is_ascii_lowercase() && !TALL_LOWERCASE.contains(c) {
                0.75
            } else {
                0.9
            }
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_reduce_tiers() {
        assert_eq!(accent_reduce("a"), 0.75);
        assert_eq!(accent_reduce("x"), 0.75);
        assert_eq!(accent_reduce("t"), 0.9);
        assert_eq!(accent_reduce("A"), 0.9);
        assert_eq!(accent_reduce("ab"), 1.0);
        assert_eq!(accent_reduce(""), 1.0);
    }
}
