//! Directive table of the TLatex markup.
//!
//! The layout engine repeatedly searches the remaining markup for the
//! directive that starts earliest; entry order in [`DIRECTIVES`] only breaks
//! ties between directives found at the same position.

/// Kind of bracketed argument a directive takes, as in `#color[2]{...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Float,
    String,
}

/// Line drawn along a laid-out sub-expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Underline,
    Overline,
    LineThrough,
}

impl Decoration {
    /// Value of the `text-decoration` attribute
    pub fn as_css(self) -> &'static str {
        match self {
            Decoration::Underline => "underline",
            Decoration::Overline => "overline",
            Decoration::LineThrough => "line-through",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleToggle {
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Low,
    Up,
}

impl Script {
    /// Character that opens a chained script, e.g. the `^` in `x_{1}^{2}`
    pub fn marker(self) -> char {
        match self {
            Script::Low => '_',
            Script::Up => '^',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Script::Low => "subscript",
            Script::Up => "superscript",
        }
    }
}

/// Accent drawn above (or across) its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Hat,
    Check,
    Acute,
    Grave,
    Dot,
    DoubleDot,
    Tilde,
    Slash,
    Vec,
}

impl Accent {
    /// Spacing-modifier glyph the accent stands for
    pub fn glyph(self) -> char {
        match self {
            Accent::Hat => '\u{02C6}',
            Accent::Check => '\u{02C7}',
            Accent::Acute => '\u{02CA}',
            Accent::Grave => '\u{02CB}',
            Accent::Dot => '\u{02D9}',
            Accent::DoubleDot => '\u{02BA}',
            Accent::Tilde => '\u{02DC}',
            Accent::Slash => '\u{2215}',
            Accent::Vec => '\u{02ED}',
        }
    }

    /// Accents that need their argument to be at least a minimal width
    pub fn needs_min_width(self) -> bool {
        matches!(
            self,
            Accent::Hat | Accent::Check | Accent::DoubleDot | Accent::Tilde | Accent::Vec
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BigOperator {
    Sum,
    Integral,
}

/// Shape of a bracket pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Square,
    Round,
    Curly,
    Bar,
}

impl Bracket {
    pub fn pair(self) -> &'static str {
        match self {
            Bracket::Square => "[]",
            Bracket::Round => "()",
            Bracket::Curly => "{}",
            Bracket::Bar => "||",
        }
    }
}

/// What a directive does, with its category-specific parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureKind {
    Style(StyleToggle),
    Decorate(Decoration),
    Shift(Axis),
    Scale,
    Color,
    Font,
    Url,
    Script(Script),
    Accent(Accent),
    TwoLines { divider: bool, middle: bool },
    Sqrt,
    BigOperator(BigOperator),
    /// `right` is the closing token for `#left...#right...` pairs; the
    /// shorthand forms take a braced argument instead
    Brackets { bracket: Bracket, right: Option<&'static str> },
}

/// One entry of the directive table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    /// Token as written in markup, including its opening brace or bracket
    pub name: &'static str,
    pub kind: FeatureKind,
    pub arg: Option<ArgKind>,
}

const fn plain(name: &'static str, kind: FeatureKind) -> Feature {
    Feature { name, kind, arg: None }
}

const fn with_arg(name: &'static str, kind: FeatureKind, arg: ArgKind) -> Feature {
    Feature {
        name,
        kind,
        arg: Some(arg),
    }
}

const fn brackets(name: &'static str, bracket: Bracket, right: Option<&'static str>) -> Feature {
    plain(name, FeatureKind::Brackets { bracket, right })
}

use FeatureKind as K;

/// All directives, in tie-break order
pub static DIRECTIVES: &[Feature] = &[
    plain("#it{", K::Style(StyleToggle::Italic)),
    plain("#bf{", K::Style(StyleToggle::Bold)),
    plain("#underline{", K::Decorate(Decoration::Underline)),
    plain("#overline{", K::Decorate(Decoration::Overline)),
    plain("#strike{", K::Decorate(Decoration::LineThrough)),
    with_arg("#kern[", K::Shift(Axis::X), ArgKind::Float),
    with_arg("#lower[", K::Shift(Axis::Y), ArgKind::Float),
    with_arg("#scale[", K::Scale, ArgKind::Float),
    with_arg("#color[", K::Color, ArgKind::Int),
    with_arg("#font[", K::Font, ArgKind::Int),
    with_arg("#url[", K::Url, ArgKind::String),
    plain("_{", K::Script(Script::Low)),
    plain("^{", K::Script(Script::Up)),
    plain("#bar{", K::Decorate(Decoration::Overline)),
    plain("#hat{", K::Accent(Accent::Hat)),
    plain("#check{", K::Accent(Accent::Check)),
    plain("#acute{", K::Accent(Accent::Acute)),
    plain("#grave{", K::Accent(Accent::Grave)),
    plain("#dot{", K::Accent(Accent::Dot)),
    plain("#ddot{", K::Accent(Accent::DoubleDot)),
    plain("#tilde{", K::Accent(Accent::Tilde)),
    plain("#slash{", K::Accent(Accent::Slash)),
    plain("#vec{", K::Accent(Accent::Vec)),
    plain("#frac{", K::TwoLines { divider: true, middle: true }),
    plain("#splitmline{", K::TwoLines { divider: false, middle: true }),
    plain("#splitline{", K::TwoLines { divider: false, middle: false }),
    with_arg("#sqrt[", K::Sqrt, ArgKind::Int),
    plain("#sqrt{", K::Sqrt),
    plain("#sum", K::BigOperator(BigOperator::Sum)),
    plain("#int", K::BigOperator(BigOperator::Integral)),
    brackets("#left[", Bracket::Square, Some("#right]")),
    brackets("#left(", Bracket::Round, Some("#right)")),
    brackets("#left{", Bracket::Curly, Some("#right}")),
    brackets("#left|", Bracket::Bar, Some("#right|")),
    brackets("#[]{", Bracket::Square, None),
    brackets("#(){", Bracket::Round, None),
    brackets("#{}{", Bracket::Curly, None),
    brackets("#||{", Bracket::Bar, None),
];

/// Find the directive that starts earliest in `label`.
///
/// Returns its byte offset and table entry; among directives found at the
/// same offset the first-listed one wins.
pub fn find_earliest(label: &str) -> Option<(usize, &'static Feature)> {
    let mut best: Option<(usize, &'static Feature)> = None;
    for feature in DIRECTIVES {
        let Some(pos) = label.find(feature.name) else {
            continue;
        };
        if best.is_none_or(|(best_pos, _)| pos < best_pos) {
            best = Some((pos, feature));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftmost_directive_wins_over_table_order() {
        // `#bf{` is listed before `_{` but starts later
        let (pos, f) = find_earliest("x_{#bf{1}}").unwrap();
        assert_eq!(pos, 1);
        assert_eq!(f.name, "_{");
    }

    #[test]
    fn table_order_breaks_ties() {
        let (pos, f) = find_earliest("#sqrt[3]{x}").unwrap();
        assert_eq!(pos, 0);
        assert_eq!(f.kind, K::Sqrt);
        assert_eq!(f.arg, Some(ArgKind::Int));
    }

    #[test]
    fn plain_text_has_no_directive() {
        assert!(find_earliest("hello #alpha").is_none());
        assert!(find_earliest("").is_none());
    }

    #[test]
    fn big_operators_need_no_brace() {
        let (pos, f) = find_earliest("a#sum_{i}").unwrap();
        assert_eq!(pos, 1);
        assert_eq!(f.kind, K::BigOperator(BigOperator::Sum));
    }

    #[test]
    fn left_right_pairs() {
        let (_, f) = find_earliest("#left(x#right)").unwrap();
        assert_eq!(
            f.kind,
            K::Brackets {
                bracket: Bracket::Round,
                right: Some("#right)")
            }
        );
    }

    #[test]
    fn bar_is_an_overline() {
        let (_, f) = find_earliest("#bar{x}").unwrap();
        assert_eq!(f.kind, K::Decorate(Decoration::Overline));
    }

    #[test]
    fn table_size() {
        assert_eq!(DIRECTIVES.len(), 38);
        assert!(DIRECTIVES.iter().all(|f| !f.name.is_empty()));
    }
}
