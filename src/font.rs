//! Font descriptors and the color/font lookup services.
//!
//! ROOT identifies fonts by a numeric code `10 * font + precision`; only the
//! font part selects a face from [`ROOT_FONTS`].

use crate::sink::OutputSink;

/// Face names by ROOT font number. A leading `b` marks bold, `i` italic and
/// `o` oblique.
pub const ROOT_FONTS: [&str; 16] = [
    "Arial",
    "iTimes New Roman",
    "bTimes New Roman",
    "biTimes New Roman",
    "Arial",
    "oArial",
    "bArial",
    "boArial",
    "Courier New",
    "oCourier New",
    "bCourier New",
    "boCourier New",
    "Symbol",
    "Times New Roman",
    "Wingdings",
    "iSymbol",
];

/// Family names of the two symbol fonts
pub const SYMBOL_FAMILY: &str = "Symbol";
pub const WINGDINGS_FAMILY: &str = "Wingdings";
pub const TIMES_FAMILY: &str = "Times New Roman";

const DEFAULT_AVER_WIDTH: f64 = 0.55;
const MONOSPACE_AVER_WIDTH: f64 = 0.61;

/// Symbol font whose glyphs are drawn through a code-point remap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolFont {
    Symbol,
    Wingdings,
}

impl SymbolFont {
    pub fn family(self) -> &'static str {
        match self {
            SymbolFont::Symbol => SYMBOL_FAMILY,
            SymbolFont::Wingdings => WINGDINGS_FAMILY,
        }
    }
}

/// Slant of a font face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontSlant {
    pub fn as_css(self) -> &'static str {
        match self {
            FontSlant::Normal => "normal",
            FontSlant::Italic => "italic",
            FontSlant::Oblique => "oblique",
        }
    }
}

/// A resolved font: face, size and the average glyph width ratio used by the
/// approximate width model.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandler {
    /// ROOT font code this handler was built from
    pub index: i32,
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub slant: FontSlant,
    pub aver_width: f64,
    /// Set when text must be remapped to reach the glyphs of a symbol font
    pub symbol: Option<SymbolFont>,
    /// Write `normal` weight/style explicitly instead of omitting them
    pub use_full_style: bool,
}

impl FontHandler {
    /// Build a handler from a ROOT font code such as `42` or `132`.
    pub fn new(index: i32, size: f64) -> Self {
        let face = usize::try_from(index / 10)
            .ok()
            .and_then(|i| ROOT_FONTS.get(i))
            .copied()
            .unwrap_or(ROOT_FONTS[0]);

        let mut name = face;
        let mut bold = false;
        let mut slant = FontSlant::Normal;
        loop {
            match name.as_bytes().first() {
                Some(b'b') => bold = true,
                Some(b'i') => slant = FontSlant::Italic,
                Some(b'o') => slant = FontSlant::Oblique,
                _ => break,
            }
            name = &name[1..];
        }

        Self::with_face(index, name, size, bold, slant)
    }

    /// Build a handler for an explicit face name.
    pub fn with_face(index: i32, name: &str, size: f64, bold: bool, slant: FontSlant) -> Self {
        let aver_width = if name.contains("Courier") {
            MONOSPACE_AVER_WIDTH
        } else {
            DEFAULT_AVER_WIDTH
        };
        let symbol = (name == WINGDINGS_FAMILY).then_some(SymbolFont::Wingdings);
        FontHandler {
            index,
            name: name.to_string(),
            size,
            bold,
            slant,
            aver_width,
            symbol,
            use_full_style: false,
        }
    }

    pub fn is_monospace(&self) -> bool {
        self.name.contains("Courier") || self.name.eq_ignore_ascii_case("monospace")
    }

    pub fn is_italic(&self) -> bool {
        self.slant != FontSlant::Normal
    }

    /// Weight attribute to write, if any
    pub fn weight_attr(&self) -> Option<&'static str> {
        match (self.bold, self.use_full_style) {
            (true, _) => Some("bold"),
            (false, true) => Some("normal"),
            (false, false) => None,
        }
    }

    /// Style attribute to write, if any
    pub fn style_attr(&self) -> Option<&'static str> {
        match (self.slant, self.use_full_style) {
            (FontSlant::Normal, false) => None,
            (slant, _) => Some(slant.as_css()),
        }
    }

    /// Apply family, weight and style to a node of the sink.
    pub fn apply<S: OutputSink>(&self, sink: &mut S, node: S::Node) {
        sink.set_font(
            node,
            &self.name,
            self.weight_attr(),
            self.style_attr(),
        );
    }
}

impl Default for FontHandler {
    fn default() -> Self {
        FontHandler::new(42, 12.0)
    }
}

/// Color and font lookup consumed by the layout engine
pub trait StyleProvider {
    /// Resolve a ROOT color index; `None` leaves the color inherited.
    fn color(&self, index: i32) -> Option<String>;

    /// Resolve a ROOT font code at the given pixel size.
    fn font(&self, index: i32, size: f64) -> FontHandler {
        FontHandler::new(index, size)
    }
}

/// The default ROOT palette and font table
#[derive(Debug, Clone, Copy, Default)]
pub struct RootPalette;

const BASE_COLORS: [&str; 11] = [
    "white",
    "black",
    "red",
    "green",
    "blue",
    "yellow",
    "magenta",
    "cyan",
    "rgb(89,212,84)",
    "rgb(89,84,217)",
    "white",
];

impl StyleProvider for RootPalette {
    fn color(&self, index: i32) -> Option<String> {
        let name = match index {
            0..=10 => BASE_COLORS[index as usize],
            400 => "yellow",
            416 => "green",
            432 => "cyan",
            600 => "blue",
            616 => "magenta",
            632 => "red",
            800 => "rgb(255,204,0)",
            920 => "rgb(204,204,204)",
            _ => return None,
        };
        Some(name.to_string())
    }
}
