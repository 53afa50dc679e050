//! Size and placement fixes for SVG produced by the external renderer.
//!
//! The renderer reports its size in `ex` units and its baseline through a
//! `vertical-align` style. Both are converted to pixels of the label font
//! here, and the graphic is then aligned inside the label box the same way
//! natively laid-out text is.

use std::sync::LazyLock;

use glam::{DVec2, dvec2};
use regex_lite::Regex;

use crate::args::{parse_float, parse_int};
use crate::errors::BridgeError;
use crate::layout::{fmt_num, round};
use crate::sink::TextExtent;

/// Horizontal anchor of a label inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical anchor of a label inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
    /// Bottom edge at the text baseline
    BottomBase,
}

static SVG_OPEN_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<svg\b([^>]*?)(/?)>").ok());

static ATTRIBUTE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).ok());

/// Root element of a rendered graphic, with its content kept verbatim
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgFragment {
    /// Attributes of the `<svg>` root in document order
    pub attributes: Vec<(String, String)>,
    /// Everything between the root's tags
    pub body: String,
    /// Extent measured by a live renderer, if any
    pub bbox: Option<TextExtent>,
}

impl SvgFragment {
    /// Split renderer output into root attributes and body.
    pub fn parse(markup: &str) -> Result<Self, BridgeError> {
        let malformed = |message: &str| BridgeError::Malformed {
            message: message.to_string(),
        };

        let (Some(open_tag), Some(attribute)) = (SVG_OPEN_TAG.as_ref(), ATTRIBUTE.as_ref()) else {
            return Err(malformed("attribute scanner unavailable"));
        };
        let open = open_tag
            .captures(markup)
            .ok_or_else(|| malformed("no <svg> root element"))?;
        let (Some(whole), Some(attrs)) = (open.get(0), open.get(1)) else {
            return Err(malformed("no <svg> root element"));
        };

        let attributes = attribute
            .captures_iter(attrs.as_str())
            .filter_map(|c| Some((c.get(1)?.as_str().to_string(), c.get(2)?.as_str().to_string())))
            .collect();

        let self_closing = open.get(2).is_some_and(|m| !m.as_str().is_empty());
        let body = if self_closing {
            String::new()
        } else {
            let rest = &markup[whole.end()..];
            let end = rest
                .rfind("</svg>")
                .ok_or_else(|| malformed("unterminated <svg> root element"))?;
            rest[..end].to_string()
        };

        Ok(SvgFragment {
            attributes,
            body,
            bbox: None,
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    /// Serialize back to SVG markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<svg");
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {key}=\"{value}\""));
        }
        out.push('>');
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }
}

/// Convert an `ex` length to pixels; `font_size` pixels are two ex.
pub fn ex_to_px(value: &str, font_size: f64) -> Option<f64> {
    if value.len() < 3 {
        return None;
    }
    let pos = value.find("ex")?;
    if pos != value.len() - 2 {
        return None;
    }
    parse_float(&value[..pos]).map(|v| v * font_size * 0.5)
}

/// Baseline offset from a `vertical-align: -0.5ex;` style.
fn vertical_align(style: &str, font_size: f64) -> Option<f64> {
    if style.len() <= 18 || !style.starts_with("vertical-align:") {
        return None;
    }
    let pos = style.find("ex;")?;
    if pos == 0 || pos != style.len() - 3 {
        return None;
    }
    ex_to_px(style.get(16..style.len() - 1)?, font_size)
}

/// Outcome of [`repair_size`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairedSize {
    /// Drawn size in pixels, measured when available
    pub size: DVec2,
    /// Baseline offset in pixels
    pub valign: Option<f64>,
}

/// Replace the `ex` based size of `svg` by whole pixels.
///
/// The `style` attribute is dropped; its baseline offset is returned
/// instead.
pub fn repair_size(svg: &mut SvgFragment, font_size: f64) -> RepairedSize {
    let pixels = |v: Option<f64>| match v {
        Some(v) if v > 0.5 => round(v),
        _ => 1.0,
    };

    let width = pixels(svg.attr("width").and_then(|v| ex_to_px(v, font_size)));
    let height = pixels(svg.attr("height").and_then(|v| ex_to_px(v, font_size)));
    let valign = svg.attr("style").and_then(|s| vertical_align(s, font_size));

    svg.set_attr("width", fmt_num(width));
    svg.set_attr("height", fmt_num(height));
    svg.remove_attr("style");

    let size = match svg.bbox {
        Some(bbox) => dvec2(bbox.width, bbox.height) * 1.05,
        None => dvec2(width, height),
    };

    RepairedSize { size, valign }
}

/// Label box the rendered graphic is aligned in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    /// Anchor point; moved by [`apply_attributes`]
    pub position: DVec2,
    /// Size of the label box
    pub size: DVec2,
    pub align: (HorizontalAlign, VerticalAlign),
    /// Rotation in degrees; only multiples of 90 swap axes
    pub rotate: i32,
    pub valign: Option<f64>,
}

/// Final transform of the graphic's container
pub fn placement_transform(position: DVec2, rotate: i32) -> Option<String> {
    let mut parts = Vec::new();
    if position != DVec2::ZERO {
        parts.push(format!(
            "translate({},{})",
            fmt_num(position.x),
            fmt_num(position.y)
        ));
    }
    if rotate != 0 {
        parts.push(format!("rotate({rotate})"));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Scale the graphic by `svg_factor` and align it in `placement`.
///
/// Returns the transform for the graphic's container.
pub fn apply_attributes(
    svg: &mut SvgFragment,
    placement: &mut Placement,
    font_size: f64,
    svg_factor: f64,
) -> Option<String> {
    let width = svg.attr("width").and_then(parse_int);
    let height = svg.attr("height").and_then(parse_int);

    if let Some(view_box) = svg.attr("viewBox") {
        if view_box.find("NaN").is_some_and(|p| p > 0) {
            let fixed = view_box.replace("NaN", "600");
            svg.set_attr("viewBox", fixed);
        }
    }

    let (mut mw, mut mh) = match (width, height) {
        (Some(w), Some(h)) => (w as f64, h as f64),
        _ => {
            let bbox = svg.bbox.unwrap_or(TextExtent {
                width: 0.0,
                height: 0.0,
            });
            let pick = |measured: f64, reported: Option<i64>, fallback: f64| {
                if measured != 0.0 {
                    measured
                } else {
                    reported.filter(|v| *v != 0).map_or(fallback, |v| v as f64)
                }
            };
            (pick(bbox.width, width, 100.0), pick(bbox.height, height, 10.0))
        }
    };

    if width.is_some() && height.is_some() && svg_factor > 0.0 {
        mw /= svg_factor;
        mh /= svg_factor;
        svg.set_attr("width", fmt_num(round(mw)));
        svg.set_attr("height", fmt_num(round(mh)));
    }

    if svg_factor > 0.0 {
        if let Some(valign) = placement.valign.as_mut() {
            *valign /= svg_factor;
        }
    }
    let valign = *placement
        .valign
        .get_or_insert((font_size - mh) / 2.0);

    let (sign, swapped) = match placement.rotate {
        180 => (dvec2(-1.0, -1.0), false),
        90 => (dvec2(1.0, -1.0), true),
        270 => (dvec2(-1.0, 1.0), true),
        _ => (dvec2(1.0, 1.0), false),
    };

    let free = placement.size - dvec2(mw, mh);
    let along = match placement.align.0 {
        HorizontalAlign::Start => 0.0,
        HorizontalAlign::Middle => sign.x * free.x / 2.0,
        HorizontalAlign::End => sign.x * free.x,
    };
    let across = match placement.align.1 {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => sign.y * free.y / 2.0,
        VerticalAlign::Bottom => sign.y * free.y,
        VerticalAlign::BottomBase => sign.y * (free.y - valign),
    };

    let delta = dvec2(along, across);
    placement.position += if swapped { dvec2(delta.y, delta.x) } else { delta };

    placement_transform(placement.position, placement.rotate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4.5ex" height="2.009ex" style="vertical-align: -0.505ex;" viewBox="0 -750 1989 888"><g><path d="M0 0"/></g></svg>"#;

    #[test]
    fn parses_root_and_body() {
        let svg = SvgFragment::parse(RENDERED).unwrap();
        assert_eq!(svg.attr("width"), Some("4.5ex"));
        assert_eq!(svg.attr("viewBox"), Some("0 -750 1989 888"));
        assert_eq!(svg.body, r#"<g><path d="M0 0"/></g>"#);
        assert!(SvgFragment::parse("<g/>").is_err());
        assert!(SvgFragment::parse("<svg width=\"1\">").is_err());
    }

    #[test]
    fn ex_lengths() {
        assert_eq!(ex_to_px("2ex", 20.0), Some(20.0));
        assert_eq!(ex_to_px("ex", 20.0), None);
        assert_eq!(ex_to_px("2px", 20.0), None);
        assert_eq!(ex_to_px("1ex2ex", 20.0), None);
        assert_eq!(ex_to_px("-0.5ex", 20.0), Some(-5.0));
    }

    #[test]
    fn repair_converts_units_and_drops_style() {
        let mut svg = SvgFragment::parse(RENDERED).unwrap();
        let repaired = repair_size(&mut svg, 20.0);
        assert_eq!(svg.attr("width"), Some("45"));
        assert_eq!(svg.attr("height"), Some("20"));
        assert_eq!(svg.attr("style"), None);
        assert_eq!(repaired.size, dvec2(45.0, 20.0));
        let valign = repaired.valign.unwrap();
        assert!((valign + 5.05).abs() < 1e-9);
    }

    #[test]
    fn tiny_or_missing_sizes_become_one_pixel() {
        let mut svg = SvgFragment::parse(r#"<svg width="0.01ex"></svg>"#).unwrap();
        let repaired = repair_size(&mut svg, 20.0);
        assert_eq!(repaired.size, dvec2(1.0, 1.0));
        assert_eq!(repaired.valign, None);
    }

    #[test]
    fn measured_box_is_enlarged() {
        let mut svg = SvgFragment::parse(RENDERED).unwrap();
        svg.bbox = Some(TextExtent {
            width: 100.0,
            height: 20.0,
        });
        let repaired = repair_size(&mut svg, 20.0);
        assert_eq!(repaired.size, dvec2(105.0, 21.0));
    }

    fn placement(align: (HorizontalAlign, VerticalAlign), rotate: i32) -> Placement {
        Placement {
            position: dvec2(10.0, 20.0),
            size: dvec2(100.0, 40.0),
            align,
            rotate,
            valign: None,
        }
    }

    fn sized(width: u32, height: u32) -> SvgFragment {
        SvgFragment::parse(&format!(r#"<svg width="{width}" height="{height}"></svg>"#)).unwrap()
    }

    #[test]
    fn centers_in_box() {
        let mut svg = sized(40, 20);
        let mut p = placement((HorizontalAlign::Middle, VerticalAlign::Middle), 0);
        let transform = apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        assert_eq!(p.position, dvec2(40.0, 30.0));
        assert_eq!(p.valign, Some(0.0));
        assert_eq!(transform.as_deref(), Some("translate(40,30)"));
    }

    #[test]
    fn bottom_base_uses_baseline() {
        let mut svg = sized(40, 20);
        let mut p = placement((HorizontalAlign::End, VerticalAlign::BottomBase), 0);
        p.valign = Some(-4.0);
        apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        assert_eq!(p.position, dvec2(70.0, 44.0));
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let mut svg = sized(40, 20);
        let mut p = placement((HorizontalAlign::End, VerticalAlign::Bottom), 270);
        let transform = apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        // x moves by the vertical free space, y by the horizontal one
        assert_eq!(p.position, dvec2(10.0 + 20.0, 20.0 - 60.0));
        assert_eq!(transform.as_deref(), Some("translate(30,-40) rotate(270)"));
    }

    #[test]
    fn clockwise_quarter_turn_swaps_axes() {
        let mut svg = sized(40, 20);
        let mut p = placement((HorizontalAlign::Middle, VerticalAlign::Top), 90);
        let transform = apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        // horizontal centring lands on y
        assert_eq!(p.position, dvec2(10.0, 20.0 + 30.0));
        assert_eq!(transform.as_deref(), Some("translate(10,50) rotate(90)"));
    }

    #[test]
    fn half_turn_flips_both() {
        let mut svg = sized(40, 20);
        let mut p = placement((HorizontalAlign::End, VerticalAlign::Bottom), 180);
        apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        assert_eq!(p.position, dvec2(-50.0, 0.0));
    }

    #[test]
    fn factor_scales_reported_size() {
        let mut svg = sized(80, 40);
        let mut p = placement((HorizontalAlign::Start, VerticalAlign::Top), 0);
        p.valign = Some(8.0);
        apply_attributes(&mut svg, &mut p, 20.0, 2.0);
        assert_eq!(svg.attr("width"), Some("40"));
        assert_eq!(svg.attr("height"), Some("20"));
        assert_eq!(p.valign, Some(4.0));
    }

    #[test]
    fn nan_view_box_is_patched() {
        let mut svg = SvgFragment::parse(r#"<svg width="1" height="1" viewBox="0 NaN 5 NaN"></svg>"#)
            .unwrap();
        let mut p = Placement::default();
        assert_eq!(apply_attributes(&mut svg, &mut p, 10.0, 0.0), None);
        assert_eq!(svg.attr("viewBox"), Some("0 600 5 600"));
    }

    #[test]
    fn unsized_graphic_uses_fallback_box() {
        let mut svg = SvgFragment::parse("<svg></svg>").unwrap();
        let mut p = placement((HorizontalAlign::Middle, VerticalAlign::Top), 0);
        apply_attributes(&mut svg, &mut p, 20.0, 0.0);
        assert_eq!(p.position.x, 10.0);
        assert_eq!(p.valign, Some(5.0));
    }
}
