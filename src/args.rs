//! Bracketed directive arguments such as the `2` in `#color[2]{x}`.
//!
//! Numbers are read leniently: leading whitespace is skipped and anything
//! after the numeric prefix is ignored, so `#scale[1.5x]{...}` scales by 1.5.

use pest::Parser;
use pest_derive::Parser;

use crate::errors::LayoutError;
use crate::grammar::{ArgKind, Feature};
use crate::log::warn;

#[derive(Parser)]
#[grammar = "args.pest"]
struct ArgsParser;

/// Parsed value of a bracketed argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Argument<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl Argument<'_> {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Argument::Int(v) => v as f64,
            Argument::Float(v) => v,
            Argument::Text(_) => 0.0,
        }
    }

    /// Integer value narrowed to the range of ROOT color and font codes
    pub fn as_index(&self) -> i32 {
        match *self {
            Argument::Int(v) => v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            _ => 0,
        }
    }
}

fn parse_int_digits(digits: &str) -> i64 {
    let (negative, body) = match digits.as_bytes().first() {
        Some(b'-') => (true, &digits[1..]),
        Some(b'+') => (false, &digits[1..]),
        _ => (false, digits),
    };
    let magnitude = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => body.parse::<i64>(),
    }
    .unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

/// Leading integer of `text`, decimal or `0x` hexadecimal.
pub fn parse_int(text: &str) -> Option<i64> {
    let pairs = ArgsParser::parse(Rule::int_prefix, text).ok()?;
    pairs
        .flatten()
        .find(|p| matches!(p.as_rule(), Rule::hex_int | Rule::dec_int))
        .map(|p| parse_int_digits(p.as_str()))
}

/// Leading finite number of `text`.
pub fn parse_float(text: &str) -> Option<f64> {
    let pairs = ArgsParser::parse(Rule::float_prefix, text).ok()?;
    pairs
        .flatten()
        .find(|p| p.as_rule() == Rule::number)
        .and_then(|p| p.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Consume the bracketed argument of `feature` from the cursor.
///
/// The cursor sits right after the opening `[`; on success it is moved past
/// the closing `]{`, so the braced body follows with its brace consumed.
pub fn bracketed<'a>(label: &mut &'a str, feature: &Feature) -> Result<Argument<'a>, LayoutError> {
    let kind = feature.arg.unwrap_or(ArgKind::String);

    let Some(end) = label.find("]{") else {
        warn!(directive = feature.name, "missing argument");
        return Err(LayoutError::missing_argument(feature.name, label));
    };
    let raw = &label[..end];

    let value = match kind {
        ArgKind::Int => parse_int(raw).map(Argument::Int).ok_or_else(|| {
            warn!(value = raw, "wrong int argument");
            LayoutError::invalid_integer(raw, label)
        })?,
        ArgKind::Float => parse_float(raw).map(Argument::Float).ok_or_else(|| {
            warn!(value = raw, "wrong float argument");
            LayoutError::invalid_float(raw, label)
        })?,
        ArgKind::String => Argument::Text(raw),
    };

    *label = &label[end + 2..];
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::find_earliest;

    #[test]
    fn integers() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int("  -3abc"), Some(-3));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0x1A"), Some(26));
        assert_eq!(parse_int("-0x10"), Some(-16));
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("x1"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float(" .25em"), Some(0.25));
        assert_eq!(parse_float("-2e1"), Some(-20.0));
        assert_eq!(parse_float("3e"), Some(3.0));
        assert_eq!(parse_float("1."), Some(1.0));
        assert_eq!(parse_float("Infinity"), None);
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn bracketed_argument_moves_cursor() {
        let (_, feature) = find_earliest("#color[2]{x}").unwrap();
        let mut label = "2]{x}";
        let arg = bracketed(&mut label, feature).unwrap();
        assert_eq!(arg, Argument::Int(2));
        assert_eq!(label, "x}");
    }

    #[test]
    fn url_argument_is_text() {
        let (_, feature) = find_earliest("#url[http://a.b]{link}").unwrap();
        let mut label = "http://a.b]{link}";
        assert_eq!(
            bracketed(&mut label, feature).unwrap(),
            Argument::Text("http://a.b")
        );
    }

    #[test]
    fn malformed_arguments() {
        let (_, color) = find_earliest("#color[").unwrap();
        let mut label = "red]{x}";
        assert!(matches!(
            bracketed(&mut label, color),
            Err(LayoutError::InvalidInteger { .. })
        ));

        let (_, scale) = find_earliest("#scale[").unwrap();
        let mut label = "big]{x}";
        assert!(matches!(
            bracketed(&mut label, scale),
            Err(LayoutError::InvalidFloat { .. })
        ));

        let mut label = "2}{x}";
        assert!(matches!(
            bracketed(&mut label, color),
            Err(LayoutError::MissingArgument { .. })
        ));
    }

    #[test]
    fn index_is_clamped() {
        assert_eq!(Argument::Int(1 << 40).as_index(), i32::MAX);
        assert_eq!(Argument::Int(-3).as_index(), -3);
    }
}
