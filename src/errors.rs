//! Error types with rich diagnostics using miette
//!
//! Layout errors carry the markup fragment that was being scanned when the
//! problem was found, so a report points at the offending brace or argument.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Name given to markup fragments in diagnostics
const FRAGMENT: &str = "<markup>";

fn fragment(src: &str) -> NamedSource<String> {
    NamedSource::new(FRAGMENT, src.to_string())
}

// ============================================================================
// Layout Errors
// ============================================================================

/// Structural errors in LaTeX markup.
///
/// Any of these aborts the whole layout call; the caller is expected to fall
/// back to drawing the raw string as plain text.
#[derive(Error, Diagnostic, Debug)]
pub enum LayoutError {
    #[error("mismatch between `{open}` and `{close}`")]
    #[diagnostic(
        code(tlatex::layout::unbalanced_braces),
        help("every `{open}` needs a matching `{close}`")
    )]
    UnbalancedBraces {
        open: String,
        close: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this group is never closed")]
        span: SourceSpan,
    },

    #[error("expected `{open}`")]
    #[diagnostic(code(tlatex::layout::missing_open_brace))]
    MissingOpenBrace {
        open: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("argument should start here")]
        span: SourceSpan,
    },

    #[error("missing argument for `{directive}`")]
    #[diagnostic(
        code(tlatex::layout::missing_argument),
        help("bracketed arguments are written as `{directive}value]{{...}}`")
    )]
    MissingArgument {
        directive: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("no `]{{` found after this point")]
        span: SourceSpan,
    },

    #[error("wrong integer argument `{value}`")]
    #[diagnostic(code(tlatex::layout::invalid_integer))]
    InvalidInteger {
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not an integer")]
        span: SourceSpan,
    },

    #[error("wrong float argument `{value}`")]
    #[diagnostic(code(tlatex::layout::invalid_float))]
    InvalidFloat {
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a finite number")]
        span: SourceSpan,
    },

    #[error("duplicate {kind} after `{directive}`")]
    #[diagnostic(
        code(tlatex::layout::duplicate_script),
        help("write `x_{{a}}^{{b}}`, not two subscripts or two superscripts in a row")
    )]
    DuplicateScript {
        kind: &'static str,
        directive: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("second {kind} starts here")]
        span: SourceSpan,
    },
}

impl LayoutError {
    pub(crate) fn unbalanced(open: &str, close: &str, src: &str) -> Self {
        LayoutError::UnbalancedBraces {
            open: open.to_string(),
            close: close.to_string(),
            src: fragment(src),
            span: (0, src.len()).into(),
        }
    }

    pub(crate) fn missing_open(open: &str, src: &str) -> Self {
        LayoutError::MissingOpenBrace {
            open: open.to_string(),
            src: fragment(src),
            span: (0, src.len().min(open.len().max(1))).into(),
        }
    }

    pub(crate) fn missing_argument(directive: &'static str, src: &str) -> Self {
        LayoutError::MissingArgument {
            directive,
            src: fragment(src),
            span: (0, src.len()).into(),
        }
    }

    pub(crate) fn invalid_integer(value: &str, src: &str) -> Self {
        LayoutError::InvalidInteger {
            value: value.to_string(),
            src: fragment(src),
            span: (0, value.len()).into(),
        }
    }

    pub(crate) fn invalid_float(value: &str, src: &str) -> Self {
        LayoutError::InvalidFloat {
            value: value.to_string(),
            src: fragment(src),
            span: (0, value.len()).into(),
        }
    }

    pub(crate) fn duplicate_script(kind: &'static str, directive: &'static str, src: &str) -> Self {
        LayoutError::DuplicateScript {
            kind,
            directive,
            src: fragment(src),
            span: (0, src.len()).into(),
        }
    }
}

// ============================================================================
// Bridge Errors
// ============================================================================

/// Errors from the external TeX renderer bridge.
///
/// Cloneable so that one failed initialization can be delivered to every
/// caller waiting on it.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("failed to load external TeX renderer: {message}")]
    #[diagnostic(
        code(tlatex::bridge::load),
        help("the native layout engine can still draw this label")
    )]
    Load { message: String },

    #[error("external TeX renderer failed: {message}")]
    #[diagnostic(code(tlatex::bridge::render))]
    Render { message: String },

    #[error("renderer returned malformed SVG: {message}")]
    #[diagnostic(code(tlatex::bridge::malformed))]
    Malformed { message: String },

    #[error("renderer initialization was abandoned before it completed")]
    #[diagnostic(code(tlatex::bridge::abandoned))]
    Abandoned,
}
