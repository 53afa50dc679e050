//! Brace-balanced argument extraction.
//!
//! Every function here consumes from a `&mut &str` cursor over the markup
//! that remains to be laid out.

use std::borrow::Cow;

use crate::errors::LayoutError;
use crate::grammar::Script;
use crate::log::warn;

/// What must open the argument being extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// The opening brace was already consumed with the directive token
    Consumed,
    /// The argument must start with the opening brace
    Required,
    /// Like `Required`, and a directly following `marker{...}` is folded
    /// into this argument once: `a^{b}^{2}` reads as `a^{b^{2}}`
    Fold(char),
}

/// Extract a braced argument using `{` and `}`.
pub fn braced<'a>(label: &mut &'a str, opening: Opening) -> Result<Cow<'a, str>, LayoutError> {
    delimited(label, opening, "{", "}")
}

/// Extract an argument with custom delimiters, balancing nested pairs.
///
/// On success the cursor is left right after the closing delimiter.
pub fn delimited<'a>(
    label: &mut &'a str,
    opening: Opening,
    open: &str,
    close: &str,
) -> Result<Cow<'a, str>, LayoutError> {
    let mut fold = None;
    if opening != Opening::Consumed {
        let Some(rest) = label.strip_prefix(open) else {
            warn!(open, label = *label, "argument does not start with opening brace");
            return Err(LayoutError::missing_open(open, label));
        };
        *label = rest;
        if let Opening::Fold(marker) = opening {
            fold = Some(marker);
        }
    }

    let text: &'a str = label;
    let mut pos = 0;
    let mut depth = 1;
    let mut folded = false;

    while depth > 0 && pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(open) {
            depth += 1;
            pos += open.len();
        } else if rest.starts_with(close) {
            depth -= 1;
            pos += close.len();
            let refold = match fold {
                Some(marker) if depth == 0 => text[pos..]
                    .strip_prefix(marker)
                    .is_some_and(|after| after.starts_with(open))
                    .then_some(marker),
                _ => None,
            };
            if let Some(marker) = refold {
                depth += 1;
                pos += marker.len_utf8() + open.len();
                fold = None;
                folded = true;
            }
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    if depth > 0 {
        warn!(open, close, label = text, "unbalanced braces");
        return Err(LayoutError::unbalanced(open, close, text));
    }

    let inner = &text[..pos - close.len()];
    *label = &text[pos..];

    Ok(if folded {
        Cow::Owned(format!("{open}{inner}{close}"))
    } else {
        Cow::Borrowed(inner)
    })
}

/// Sub- and superscript arguments following a base
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scripts<'a> {
    pub low: Option<Cow<'a, str>>,
    pub up: Option<Cow<'a, str>>,
}

impl<'a> Scripts<'a> {
    fn slot(&mut self, script: Script) -> &mut Option<Cow<'a, str>> {
        match script {
            Script::Low => &mut self.low,
            Script::Up => &mut self.up,
        }
    }

    /// Subscript, if present and non-empty
    pub fn low(&self) -> Option<&str> {
        self.low.as_deref().filter(|s| !s.is_empty())
    }

    /// Superscript, if present and non-empty
    pub fn up(&self) -> Option<&str> {
        self.up.as_deref().filter(|s| !s.is_empty())
    }
}

/// Extract a chain of `_{...}` / `^{...}` arguments.
///
/// With `first` set the cursor sits on the `{` of that script's argument.
/// Each kind may appear once; a repeated non-empty kind is an error.
pub fn scripts<'a>(
    label: &mut &'a str,
    first: Option<Script>,
    directive: &'static str,
) -> Result<Scripts<'a>, LayoutError> {
    let mut res = Scripts::default();

    if let Some(script) = first {
        *res.slot(script) = Some(braced(label, Opening::Fold(script.marker()))?);
    }

    loop {
        let script = match label.chars().next() {
            Some('_') => Script::Low,
            Some('^') => Script::Up,
            _ => break,
        };
        *label = &label[1..];

        let slot = res.slot(script);
        if slot.as_deref().is_some_and(|s| !s.is_empty()) {
            warn!(directive, label = *label, "duplicate {}", script.describe());
            return Err(LayoutError::duplicate_script(script.describe(), directive, label));
        }
        *slot = Some(braced(label, Opening::Fold(script.marker()))?);
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumed_opening_extracts_until_balance() {
        let mut label = "a{b}c}rest";
        let sub = braced(&mut label, Opening::Consumed).unwrap();
        assert_eq!(sub, "a{b}c");
        assert_eq!(label, "rest");
    }

    #[test]
    fn required_opening_must_be_present() {
        let mut label = "x}";
        let err = braced(&mut label, Opening::Required).unwrap_err();
        assert!(matches!(err, LayoutError::MissingOpenBrace { .. }));
        assert_eq!(label, "x}");
    }

    #[test]
    fn unbalanced_is_an_error() {
        let mut label = "{2";
        let err = braced(&mut label, Opening::Required).unwrap_err();
        assert!(matches!(err, LayoutError::UnbalancedBraces { .. }));
    }

    #[test]
    fn custom_delimiters() {
        let mut label = "x#left(y#right)#right) tail";
        let sub = delimited(&mut label, Opening::Consumed, "#left(", "#right)").unwrap();
        assert_eq!(sub, "x#left(y#right)");
        assert_eq!(label, " tail");
    }

    #[test]
    fn repeated_marker_folds_once() {
        let mut label = "{b}^{2}";
        let sub = braced(&mut label, Opening::Fold('^')).unwrap();
        assert_eq!(sub, "{b}^{2}");
        assert_eq!(label, "");
    }

    #[test]
    fn script_chain() {
        let mut label = "{i}^{2} + 1";
        let s = scripts(&mut label, Some(Script::Low), "_{").unwrap();
        assert_eq!(s.low(), Some("i"));
        assert_eq!(s.up(), Some("2"));
        assert_eq!(label, " + 1");
    }

    #[test]
    fn chain_without_leading_script() {
        let mut label = "_{0}^{n}x";
        let s = scripts(&mut label, None, "#sum").unwrap();
        assert_eq!(s.low(), Some("0"));
        assert_eq!(s.up(), Some("n"));
        assert_eq!(label, "x");
    }

    #[test]
    fn duplicate_script_fails() {
        let mut label = "{1}^{a}_{2}";
        let err = scripts(&mut label, Some(Script::Low), "_{").unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateScript { .. }));
    }

    #[test]
    fn empty_script_counts_as_unset() {
        let mut label = "{}^{1}_{2}";
        let s = scripts(&mut label, Some(Script::Low), "_{").unwrap();
        assert_eq!(s.low(), Some("2"));
        assert_eq!(s.up(), Some("1"));
    }
}
