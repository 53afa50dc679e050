//! Escape-token symbol table and the plain LaTeX translator.
//!
//! Tokens such as `#alpha` or `#leq` map to single Unicode characters. The
//! table order is significant: the PDF remap in [`crate::fallback`] numbers the
//! first 54 entries as TLatex greek letters and the next 82 as TLatex specials.

use std::sync::OnceLock;

/// Escape tokens and their replacement text, in TLatex order.
///
/// An empty replacement marks a token that only makes sense as a directive
/// (accents, `#left`/`#right`, decorations); in plain text it disappears.
#[rustfmt::skip]
pub static SYMBOLS: &[(&str, &str)] = &[
    ("#alpha", "\u{3B1}"),
    ("#beta", "\u{3B2}"),
    ("#chi", "\u{3C7}"),
    ("#delta", "\u{3B4}"),
    ("#varepsilon", "\u{3B5}"),
    ("#phi", "\u{3C6}"),
    ("#gamma", "\u{3B3}"),
    ("#eta", "\u{3B7}"),
    ("#iota", "\u{3B9}"),
    ("#varphi", "\u{3C6}"),
    ("#kappa", "\u{3BA}"),
    ("#lambda", "\u{3BB}"),
    ("#mu", "\u{3BC}"),
    ("#nu", "\u{3BD}"),
    ("#omicron", "\u{3BF}"),
    ("#pi", "\u{3C0}"),
    ("#theta", "\u{3B8}"),
    ("#rho", "\u{3C1}"),
    ("#sigma", "\u{3C3}"),
    ("#tau", "\u{3C4}"),
    ("#upsilon", "\u{3C5}"),
    ("#varomega", "\u{3D6}"),
    ("#omega", "\u{3C9}"),
    ("#xi", "\u{3BE}"),
    ("#psi", "\u{3C8}"),
    ("#zeta", "\u{3B6}"),
    ("#Alpha", "\u{391}"),
    ("#Beta", "\u{392}"),
    ("#Chi", "\u{3A7}"),
    ("#Delta", "\u{394}"),
    ("#Epsilon", "\u{395}"),
    ("#Phi", "\u{3A6}"),
    ("#Gamma", "\u{393}"),
    ("#Eta", "\u{397}"),
    ("#Iota", "\u{399}"),
    ("#vartheta", "\u{3D1}"),
    ("#Kappa", "\u{39A}"),
    ("#Lambda", "\u{39B}"),
    ("#Mu", "\u{39C}"),
    ("#Nu", "\u{39D}"),
    ("#Omicron", "\u{39F}"),
    ("#Pi", "\u{3A0}"),
    ("#Theta", "\u{398}"),
    ("#Rho", "\u{3A1}"),
    ("#Sigma", "\u{3A3}"),
    ("#Tau", "\u{3A4}"),
    ("#Upsilon", "\u{3A5}"),
    ("#varsigma", "\u{3C2}"),
    ("#Omega", "\u{3A9}"),
    ("#Xi", "\u{39E}"),
    ("#Psi", "\u{3A8}"),
    ("#Zeta", "\u{396}"),
    ("#varUpsilon", "\u{3D2}"),
    ("#epsilon", "\u{3B5}"),
    ("#leq", "\u{2264}"),
    ("#/", "\u{2044}"),
    ("#infty", "\u{221E}"),
    ("#voidb", "\u{192}"),
    ("#club", "\u{2663}"),
    ("#diamond", "\u{2666}"),
    ("#heart", "\u{2665}"),
    ("#spade", "\u{2660}"),
    ("#leftrightarrow", "\u{2194}"),
    ("#leftarrow", "\u{2190}"),
    ("#uparrow", "\u{2191}"),
    ("#rightarrow", "\u{2192}"),
    ("#downarrow", "\u{2193}"),
    ("#circ", "\u{2E30}"),
    ("#pm", "\u{B1}"),
    ("#doublequote", "\u{2033}"),
    ("#geq", "\u{2265}"),
    ("#times", "\u{D7}"),
    ("#propto", "\u{221D}"),
    ("#partial", "\u{2202}"),
    ("#bullet", "\u{2022}"),
    ("#divide", "\u{F7}"),
    ("#neq", "\u{2260}"),
    ("#equiv", "\u{2261}"),
    ("#approx", "\u{2248}"),
    ("#3dots", "\u{2026}"),
    ("#cbar", "\u{7C}"),
    ("#topbar", "\u{AF}"),
    ("#downleftarrow", "\u{21B5}"),
    ("#aleph", "\u{2135}"),
    ("#Jgothic", "\u{2111}"),
    ("#Rgothic", "\u{211C}"),
    ("#voidn", "\u{2118}"),
    ("#otimes", "\u{2297}"),
    ("#oplus", "\u{2295}"),
    ("#oslash", "\u{2205}"),
    ("#cap", "\u{2229}"),
    ("#cup", "\u{222A}"),
    ("#supset", "\u{2283}"),
    ("#supseteq", "\u{2287}"),
    ("#notsubset", "\u{2284}"),
    ("#subset", "\u{2282}"),
    ("#subseteq", "\u{2286}"),
    ("#in", "\u{2208}"),
    ("#notin", "\u{2209}"),
    ("#angle", "\u{2220}"),
    ("#nabla", "\u{2207}"),
    ("#oright", "\u{AE}"),
    ("#ocopyright", "\u{A9}"),
    ("#trademark", "\u{2122}"),
    ("#prod", "\u{220F}"),
    ("#surd", "\u{221A}"),
    ("#upoint", "\u{2027}"),
    ("#corner", "\u{AC}"),
    ("#wedge", "\u{2227}"),
    ("#vee", "\u{2228}"),
    ("#Leftrightarrow", "\u{21D4}"),
    ("#Leftarrow", "\u{21D0}"),
    ("#Uparrow", "\u{21D1}"),
    ("#Rightarrow", "\u{21D2}"),
    ("#Downarrow", "\u{21D3}"),
    ("#void2", ""),
    ("#LT", "\u{3C}"),
    ("#void1", "\u{AE}"),
    ("#copyright", "\u{A9}"),
    ("#void3", "\u{2122}"),
    ("#sum", "\u{2211}"),
    ("#arctop", "\u{239B}"),
    ("#lbar", "\u{23A2}"),
    ("#arcbottom", "\u{239D}"),
    ("#void4", ""),
    ("#void8", "\u{23A2}"),
    ("#bottombar", "\u{230A}"),
    ("#arcbar", "\u{23A7}"),
    ("#ltbar", "\u{23A8}"),
    ("#AA", "\u{212B}"),
    ("#aa", "\u{E5}"),
    ("#void06", ""),
    ("#GT", "\u{3E}"),
    ("#int", "\u{222B}"),
    ("#forall", "\u{2200}"),
    ("#exists", "\u{2203}"),
    ("#koppa", "\u{3DF}"),
    ("#sampi", "\u{3E1}"),
    ("#stigma", "\u{3DB}"),
    ("#san", "\u{3FB}"),
    ("#sho", "\u{3F8}"),
    ("#varcoppa", "\u{3D9}"),
    ("#digamma", "\u{3DD}"),
    ("#Digamma", "\u{3DC}"),
    ("#Koppa", "\u{3DE}"),
    ("#varKoppa", "\u{3D8}"),
    ("#Sampi", "\u{3E0}"),
    ("#Stigma", "\u{3DA}"),
    ("#San", "\u{3FA}"),
    ("#Sho", "\u{3F7}"),
    ("#vec", ""),
    ("#dot", "\u{22C5}"),
    ("#hat", "\u{B7}"),
    ("#ddot", ""),
    ("#acute", ""),
    ("#grave", ""),
    ("#check", "\u{2713}"),
    ("#tilde", "\u{2DC}"),
    ("#slash", "\u{2044}"),
    ("#hbar", "\u{127}"),
    ("#box", "\u{25FD}"),
    ("#Box", "\u{2610}"),
    ("#parallel", "\u{2225}"),
    ("#perp", "\u{22A5}"),
    ("#odot", "\u{2299}"),
    ("#left", ""),
    ("#right", ""),
    ("{}", ""),
    ("#mp", "\u{2213}"),
    ("#P", "\u{B6}"),
    ("#sqrt", "\u{221A}"),
    ("#bar", ""),
    ("#overline", ""),
    ("#underline", ""),
    ("#strike", ""),
];

/// Number of leading greek-letter entries in [`SYMBOLS`]
pub const GREEK_COUNT: usize = 54;

/// Tokens sorted longest first, so `#leftrightarrow` wins over `#left`.
fn tokens_longest_first() -> &'static [(&'static str, &'static str)] {
    static SORTED: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut sorted = SYMBOLS.to_vec();
        // stable: equal lengths keep table order
        sorted.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        sorted
    })
}

/// Look up the replacement for one complete token, e.g. `"#alpha"`.
pub fn symbol(token: &str) -> Option<&'static str> {
    SYMBOLS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, replacement)| *replacement)
}

/// Longest token that starts `text`, with its replacement.
fn longest_token_at(text: &str) -> Option<(&'static str, &'static str)> {
    tokens_longest_first()
        .iter()
        .find(|(name, _)| text.starts_with(name))
        .copied()
}

/// Strip every layer of braces that encloses the whole string.
///
/// Only the first and last characters are checked, so `{a}{b}` becomes `a}{b`.
pub fn strip_enclosing_braces(mut text: &str) -> &str {
    while text.chars().count() > 2 && text.starts_with('{') && text.ends_with('}') {
        text = &text[1..text.len() - 1];
    }
    text
}

/// Translate the escape tokens of a markup fragment into Unicode text.
///
/// Enclosing braces are stripped first, tokens are replaced longest-match
/// first and leftover `{}` pairs are dropped. Unknown tokens pass through.
pub fn translate_latex(markup: &str) -> String {
    let mut rest = strip_enclosing_braces(markup);
    let mut out = String::with_capacity(rest.len());

    while let Some(idx) = rest.find(['#', '{']) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        match longest_token_at(rest) {
            Some((name, replacement)) => {
                out.push_str(replacement);
                rest = &rest[name.len()..];
            }
            None => {
                // '#' and '{' are both single-byte
                out.push_str(&rest[..1]);
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    out.replace("{}", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greek_pair_translates_without_directives() {
        insta::assert_snapshot!(translate_latex("#alpha#beta"), @"αβ");
    }

    #[test]
    fn longest_token_wins() {
        insta::assert_snapshot!(translate_latex("#leftrightarrow"), @"↔");
        insta::assert_snapshot!(translate_latex("#leftarrow #left"), @"← ");
        insta::assert_snapshot!(translate_latex("#infty#int#in"), @"∞∫∈");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(translate_latex("p_T > 20 GeV"), "p_T > 20 GeV");
        assert_eq!(translate_latex(""), "");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(translate_latex("#foo and #"), "#foo and #");
    }

    #[test]
    fn diacritic_markers_vanish() {
        assert_eq!(translate_latex("#vec#acute#grave"), "");
    }

    #[test]
    fn braces_are_stripped_and_empty_pairs_removed() {
        assert_eq!(translate_latex("{{#mu}}"), "μ");
        assert_eq!(translate_latex("a{}b"), "ab");
        assert_eq!(translate_latex("{}"), "");
        assert_eq!(strip_enclosing_braces("{a}{b}"), "a}{b");
    }

    #[test]
    fn table_lookup() {
        assert_eq!(symbol("#sigma"), Some("\u{3C3}"));
        assert_eq!(symbol("#left"), Some(""));
        assert_eq!(symbol("#nothing"), None);
        assert_eq!(SYMBOLS[GREEK_COUNT].0, "#leq");
    }
}
