//! Markup to TeX translation for the external renderer.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::args::parse_int;
use crate::font::StyleProvider;
use crate::symbols::SYMBOLS;

/// Input language of a label handed to the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexDialect {
    /// ROOT markup with `#` escapes
    #[default]
    Root,
    /// Genuine TeX as written for `TMathText`
    Tex,
}

/// Escapes rewritten before the generic `#name` -> `\name` pass, in order.
const MARKUP_REWRITES: &[(&str, &str)] = &[
    ("#LT", "\\langle"),
    ("#GT", "\\rangle"),
    ("#club", "\\clubsuit"),
    ("#spade", "\\spadesuit"),
    ("#heart", "\\heartsuit"),
    ("#diamond", "\\diamondsuit"),
    ("#voidn", "\\wp"),
    ("#voidb", "f"),
    ("#copyright", "(c)"),
    ("#ocopyright", "(c)"),
    ("#trademark", "TM"),
    ("#void3", "TM"),
    ("#oright", "R"),
    ("#void1", "R"),
    ("#3dots", "\\ldots"),
    ("#lbar", "\\mid"),
    ("#void8", "\\mid"),
    ("#divide", "\\div"),
    ("#Jgothic", "\\Im"),
    ("#Rgothic", "\\Re"),
    ("#doublequote", "\""),
    ("#plus", "+"),
    ("#minus", "-"),
    ("#/", "/"),
    ("#upoint", "."),
    ("#aa", "\\mathring{a}"),
    ("#AA", "\\mathring{A}"),
    ("#omicron", "o"),
    ("#Alpha", "A"),
    ("#Beta", "B"),
    ("#Epsilon", "E"),
    ("#Zeta", "Z"),
    ("#Eta", "H"),
    ("#Iota", "I"),
    ("#Kappa", "K"),
    ("#Mu", "M"),
    ("#Nu", "N"),
    ("#Omicron", "O"),
    ("#Rho", "P"),
    ("#Tau", "T"),
    ("#Chi", "X"),
    ("#varomega", "\\varpi"),
    ("#corner", "?"),
    ("#ltbar", "?"),
    ("#bottombar", "?"),
    ("#notsubset", "?"),
    ("#arcbottom", "?"),
    ("#cbar", "?"),
    ("#arctop", "?"),
    ("#topbar", "?"),
    ("#arcbar", "?"),
    ("#downleftarrow", "?"),
    ("#splitline", "\\genfrac{}{}{0pt}{}"),
    ("#it", "\\textit"),
    ("#bf", "\\textbf"),
    ("#frac", "\\frac"),
    ("#left{", "\\lbrace"),
    ("#right}", "\\rbrace"),
    ("#left[", "\\lbrack"),
    ("#right]", "\\rbrack"),
    ("#[]{", "\\lbrack"),
    (" } ", "\\rbrack"),
    ("#[", "\\lbrack"),
    ("#]", "\\rbrack"),
    ("#{", "\\lbrace"),
    ("#}", "\\rbrace"),
    (" ", "\\;"),
];

/// TeX commands the renderer spells differently
const COMMAND_RENAMES: &[(&str, &str)] = &[
    ("upDelta", "Updelta"),
    ("upGamma", "Upgamma"),
    ("upLambda", "Uplambda"),
    ("upOmega", "Upomega"),
    ("upPhi", "Upphi"),
    ("upPi", "Uppi"),
    ("upPsi", "Uppsi"),
    ("upSigma", "Upsigma"),
    ("upTheta", "Uptheta"),
    ("upUpsilon", "Upupsilon"),
    ("upXi", "Upxi"),
    ("notcong", "ncong"),
    ("notgeq", "ngeq"),
    ("notgr", "ngtr"),
    ("notless", "nless"),
    ("notleq", "nleq"),
    ("notsucc", "nsucc"),
    ("notprec", "nprec"),
    ("notsubseteq", "nsubseteq"),
    ("notsupseteq", "nsupseteq"),
    ("openclubsuit", "clubsuit"),
    ("openspadesuit", "spadesuit"),
    ("dasharrow", "dashrightarrow"),
    ("comp", "circ"),
    ("iiintop", "iiint"),
    ("iintop", "iint"),
    ("ointop", "oint"),
];

/// TeX commands the renderer lacks, drawn as the given code point instead
const UNICODE_COMMANDS: &[(&str, u32)] = &[
    ("Digamma", 0x3DC),
    ("upDigamma", 0x3DC),
    ("digamma", 0x3DD),
    ("updigamma", 0x3DD),
    ("Koppa", 0x3DE),
    ("koppa", 0x3DF),
    ("upkoppa", 0x3DF),
    ("upKoppa", 0x3DE),
    ("VarKoppa", 0x3D8),
    ("upVarKoppa", 0x3D8),
    ("varkoppa", 0x3D9),
    ("upvarkoppa", 0x3D9),
    ("varkappa", 0x3BA),
    ("upvarkappa", 0x3BA),
    ("varbeta", 0x3D0),
    ("upvarbeta", 0x3D0),
    ("Sampi", 0x3E0),
    ("upSampi", 0x3E0),
    ("sampi", 0x3E1),
    ("upsampi", 0x3E1),
    ("Stigma", 0x3DA),
    ("upStigma", 0x3DA),
    ("stigma", 0x3DB),
    ("upstigma", 0x3DB),
    ("San", 0x3FA),
    ("upSan", 0x3FA),
    ("san", 0x3FB),
    ("upsan", 0x3FB),
    ("Sho", 0x3F7),
    ("upSho", 0x3F7),
    ("sho", 0x3F8),
    ("upsho", 0x3F8),
    ("P", 0xB6),
    ("aa", 0xB0),
    ("bulletdashcirc", 0x22B7),
    ("circdashbullet", 0x22B6),
    ("downuparrows", 0x21F5),
    ("updownarrows", 0x21C5),
    ("dashdownarrow", 0x21E3),
    ("dashuparrow", 0x21E1),
    ("complement", 0x2201),
    ("dbar", 0x18C),
    ("ddddot", 0x22EF),
    ("dddot", 0x22EF),
    ("ddots", 0x22F1),
    ("defineequal", 0x225D),
    ("defineeq", 0x225D),
    ("downdownharpoons", 0x2965),
    ("downupharpoons", 0x296F),
    ("updownharpoons", 0x296E),
    ("upupharpoons", 0x2963),
    ("hateq", 0x2259),
    ("ldbrack", 0x27E6),
    ("rdbrack", 0x27E7),
    ("leadsfrom", 0x219C),
    ("leftsquigarrow", 0x21DC),
    ("lightning", 0x2607),
    ("napprox", 0x2249),
    ("nasymp", 0x226D),
    ("nequiv", 0x2262),
    ("nsimeq", 0x2244),
    ("nsubseteq", 0x2288),
    ("nsubset", 0x2284),
    ("notapprox", 0x2249),
    ("notasymp", 0x226D),
    ("notequiv", 0x2262),
    ("notni", 0x220C),
    ("notsimeq", 0x2244),
    ("notsubseteq", 0x2288),
    ("notsubset", 0x2284),
    ("notsupseteq", 0x2289),
    ("notsupset", 0x2285),
    ("nsupset", 0x2285),
    ("setdif", 0x2216),
    ("simarrow", 0x2972),
    ("t", 0x2040),
    ("u", 0x2C7),
    ("v", 0x2C7),
    ("undercurvearrowright", 0x293B),
    ("updbar", 0x18C),
    ("wwbar", 0x2015),
    ("awointop", 0x2232),
    ("awoint", 0x2233),
    ("barintop", 0x2A1C),
    ("barint", 0x2A1B),
    ("cwintop", 0x2231),
    ("cwint", 0x2231),
    ("cwointop", 0x2233),
    ("cwoint", 0x2232),
    ("oiiintop", 0x2230),
    ("oiiint", 0x2230),
    ("oiintop", 0x222F),
    ("oiint", 0x222F),
    ("slashintop", 0x2A0F),
    ("slashint", 0x2A0F),
];

/// Escaped accents the renderer treats as text-mode only
const VERBATIM_ACCENTS: [char; 5] = ['"', '\'', '`', '=', '~'];

fn unicode_escape(code: u32) -> String {
    format!("\\unicode{{0x{code:x}}}")
}

fn command_pattern(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"\\{name}\b")).ok()
}

fn command_rewrites(table: impl Iterator<Item = (&'static str, String)>) -> Vec<(Regex, String)> {
    table
        .filter_map(|(name, replacement)| Some((command_pattern(name)?, replacement)))
        .collect()
}

static UNICODE_REWRITES: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    command_rewrites(
        UNICODE_COMMANDS
            .iter()
            .map(|&(name, code)| (name, unicode_escape(code))),
    )
});

static RENAME_REWRITES: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    command_rewrites(
        COMMAND_RENAMES
            .iter()
            .map(|&(name, target)| (name, format!("\\{target}"))),
    )
});

fn translate_root_markup<P: StyleProvider + ?Sized>(markup: &str, styles: &P) -> String {
    let mut text = markup.to_string();
    for (from, to) in MARKUP_REWRITES {
        text = text.replace(from, to);
    }
    for (token, _) in SYMBOLS {
        if token.len() > 2 {
            text = text.replace(token, &format!("\\{}", &token[1..]));
        }
    }
    rewrite_colors(&text, styles)
}

/// Turn every `#color[n]{...}` into `\color{name}{...}`.
///
/// Scanning stops at the first malformed directive; what follows it is
/// dropped.
fn rewrite_colors<P: StyleProvider + ?Sized>(text: &str, styles: &P) -> String {
    if !text.contains("#color[") {
        return text.to_string();
    }

    let mut clean = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let Some(pos) = rest.find("#color[") else {
            clean.push_str(rest);
            break;
        };
        clean.push_str(&rest[..pos]);
        rest = &rest[pos + 7..];

        let Some(end) = rest.find("]{").filter(|&p| p > 0) else {
            break;
        };
        let Some(index) = parse_int(&rest[..end]) else {
            break;
        };
        rest = &rest[end + 2..];

        let mut depth = 1usize;
        let mut close = None;
        for (i, c) in rest.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                close = Some(i);
                break;
            }
        }
        let Some(close) = close else {
            break;
        };

        let part = &rest[..close];
        rest = &rest[close + 1..];
        if part.is_empty() {
            continue;
        }
        let index = index.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        match styles.color(index) {
            Some(color) => clean.push_str(&format!("\\color{{{color}}}{{{part}}}")),
            None => clean.push_str(part),
        }
    }

    clean
}

fn apply_rewrites(text: String, rewrites: &[(Regex, String)]) -> String {
    rewrites.iter().fold(text, |acc, (pattern, replacement)| {
        pattern
            .replace_all(&acc, regex_lite::NoExpand(replacement))
            .into_owned()
    })
}

fn translate_tex(tex: &str) -> String {
    let text = match tex {
        "\\^" => "\\unicode{0x5E}".to_string(),
        "\\vec" => "\\unicode{0x2192}".to_string(),
        other => other.replace("\\.", "\\unicode{0x2E}").replace("\\^", "\\hat"),
    };

    let text = apply_rewrites(text, &UNICODE_REWRITES);
    let text = VERBATIM_ACCENTS.iter().fold(text, |acc, c| {
        acc.replace(&format!("\\{c}"), &unicode_escape(*c as u32))
    });
    apply_rewrites(text, &RENAME_REWRITES)
}

/// Translate a label into the input syntax of the external renderer.
///
/// `color` wraps the whole result in a `\color` group.
pub fn translate_math<P: StyleProvider + ?Sized>(
    text: &str,
    dialect: TexDialect,
    color: Option<&str>,
    styles: &P,
) -> String {
    let body = match dialect {
        TexDialect::Root => translate_root_markup(text, styles),
        TexDialect::Tex => translate_tex(text),
    };

    match color {
        Some(color) => format!("\\color{{{color}}}{{{body}}}"),
        None => body,
    }
}
