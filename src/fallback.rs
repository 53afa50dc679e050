//! Plain-text path and symbol-font code remapping.
//!
//! Text drawn in the Symbol or Wingdings fonts uses the fonts' private code
//! points; here they are mapped to Unicode so any font can show them. The
//! reverse direction, Unicode to symbol.ttf codes, serves outputs that embed
//! the symbol font itself (PDF).

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::font::SymbolFont;
use crate::layout::{BoundingRect, round};
use crate::metrics::approximate_label_width;
use crate::options::{RenderOptions, TextArgs};
use crate::sink::{OutputSink, SymbolSource, TextRun};
use crate::symbols::{GREEK_COUNT, SYMBOLS, translate_latex};

/// Unicode code points of Symbol font codes, starting at code 33
#[rustfmt::skip]
static SYMBOL_MAP: [u32; 213] = [
    0, 8704, 0, 8707, 0, 0, 8717, 0, 0, 8727, 0, 0,
    8722, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 8773, 913, 914, 935, 916,
    917, 934, 915, 919, 921, 977, 922, 923, 924, 925, 927, 928,
    920, 929, 931, 932, 933, 962, 937, 926, 936, 918, 0, 8756,
    0, 8869, 0, 0, 945, 946, 967, 948, 949, 966, 947, 951,
    953, 981, 954, 955, 956, 957, 959, 960, 952, 961, 963, 964,
    965, 982, 969, 958, 968, 950, 0, 402, 0, 8764, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 978, 8242, 8804, 8260,
    8734, 0, 9827, 9830, 9829, 9824, 8596, 8592, 8593, 8594, 8595, 0,
    0, 8243, 8805, 0, 8733, 8706, 8729, 0, 8800, 8801, 8776, 8230,
    0, 0, 8629, 8501, 8465, 8476, 8472, 8855, 8853, 8709, 8745, 8746,
    8835, 8839, 8836, 8834, 8838, 8712, 8713, 8736, 8711, 0, 0, 8482,
    8719, 8730, 8901, 0, 8743, 8744, 8660, 8656, 8657, 8658, 8659, 9674,
    9001, 0, 0, 8482, 8721, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 8364, 9002, 8747, 8992, 0, 8993,
];

/// Unicode code points of Wingdings codes, starting at code 33
#[rustfmt::skip]
static WINGDINGS_MAP: [u32; 222] = [
    128393, 9986, 9985, 128083, 128365, 128366, 128367, 128383,
    9990, 128386, 128387, 128234, 128235, 128236, 128237, 128193,
    128194, 128196, 128463, 128464, 128452, 8987, 128430, 128432,
    128434, 128435, 128436, 128427, 128428, 9991, 9997, 128398,
    9996, 128076, 128077, 128078, 9756, 9758, 9757, 9759,
    128400, 9786, 128528, 9785, 128163, 9760, 127987, 127985,
    9992, 9788, 128167, 10052, 128326, 10014, 128328, 10016,
    10017, 9770, 9775, 2384, 9784, 9800, 9801, 9802,
    9803, 9804, 9805, 9806, 9807, 9808, 9809, 9810,
    9811, 128624, 128629, 9679, 128318, 9632, 9633, 128912,
    10065, 10066, 11047, 10731, 9670, 10070, 11045, 8999,
    11193, 8984, 127989, 127990, 128630, 128631, 0, 9450,
    9312, 9313, 9314, 9315, 9316, 9317, 9318, 9319,
    9320, 9321, 9471, 10102, 10103, 10104, 10105, 10106,
    10107, 10108, 10109, 10110, 10111, 128610, 128608, 128609,
    128611, 128606, 128604, 128605, 128607, 183, 8226, 9642,
    9898, 128902, 128904, 9673, 9678, 128319, 9642, 9723,
    128962, 10022, 9733, 10038, 10036, 10041, 10037, 11216,
    8982, 10209, 8977, 11217, 10026, 10032, 128336, 128337,
    128338, 128339, 128340, 128341, 128342, 128343, 128344, 128345,
    128346, 128347, 11184, 11185, 11186, 11187, 11188, 11189,
    11190, 11191, 128618, 128619, 128597, 128596, 128599, 128598,
    128592, 128593, 128594, 128595, 9003, 8998, 11160, 11162,
    11161, 11163, 11144, 11146, 11145, 11147, 129128, 129130,
    129129, 129131, 129132, 129133, 129135, 129134, 129144, 129146,
    129145, 129147, 129148, 129149, 129151, 129150, 8678, 8680,
    8679, 8681, 11012, 8691, 11008, 11009, 11011, 11010,
    129196, 129197, 128502, 10004, 128503, 128505,
];

/// Number of special-symbol entries following the greek letters that have a
/// fixed position in symbol.ttf
const SPECIAL_COUNT: usize = 82;

/// Map symbol-font codes in `text` to Unicode.
///
/// Characters without a mapping are kept as they are.
pub fn replace_symbols(text: &str, font: SymbolFont) -> String {
    let map: &[u32] = match font {
        SymbolFont::Symbol => &SYMBOL_MAP,
        SymbolFont::Wingdings => &WINGDINGS_MAP,
    };
    text.chars()
        .map(|c| {
            let code = c as u32;
            let mapped = if code > 32 {
                map.get((code - 33) as usize).copied().unwrap_or(0)
            } else {
                0
            };
            if mapped == 0 {
                c
            } else {
                char::from_u32(mapped).unwrap_or(c)
            }
        })
        .collect()
}

/// symbol.ttf position of a greek letter, by its index in the symbol table.
fn greek_code(index: usize) -> u32 {
    match index {
        52 => 0o241, // varUpsilon
        53 => 0o316, // epsilon
        i if i > 25 => 97 + i as u32 - 58,
        i => 97 + i as u32,
    }
}

/// symbol.ttf position of a special symbol, by its index after the greek
/// letters.
fn special_code(index: usize) -> u32 {
    match index {
        75 => 0o305, // Angstrom
        76 => 0o345,
        80 => 0o42, // forall
        81 => 0o44, // exists
        i => 0o243 + i as u32,
    }
}

static SYMBOL_TTF_CODES: LazyLock<HashMap<u32, u32>> = LazyLock::new(|| {
    let mut codes = HashMap::new();

    for (cnt, (_, replacement)) in SYMBOLS
        .iter()
        .enumerate()
        .take(GREEK_COUNT + SPECIAL_COUNT + 1)
    {
        let mut units = replacement.encode_utf16();
        let (Some(unit), None) = (units.next(), units.next()) else {
            continue;
        };
        let letter = if cnt < GREEK_COUNT {
            greek_code(cnt)
        } else {
            special_code(cnt - GREEK_COUNT)
        };
        if unit > 0x80 {
            codes.insert(u32::from(unit), letter);
        }
    }

    for (k, &code) in SYMBOL_MAP.iter().enumerate() {
        if code != 0 {
            codes.insert(code, k as u32 + 33);
        }
    }

    codes
});

/// Code of a Unicode character in symbol.ttf, or the code itself when the
/// font has no such glyph.
pub fn remap_symbol_ttf_code(code: u32) -> u32 {
    SYMBOL_TTF_CODES.get(&code).copied().unwrap_or(code)
}

/// True when `text` contains no markup at all.
pub fn is_plain_text(text: &str) -> bool {
    !text.contains('#') && !text.contains('{')
}

/// Draw `args.text` as a single text run without layout.
///
/// Escape tokens are translated when `args.simple_latex` is set; symbol
/// fonts are remapped. The run's rectangle is stored in `args.text_rect`.
pub fn produce_plain_text<S: OutputSink>(
    sink: &mut S,
    node: S::Node,
    options: &RenderOptions,
    args: &mut TextArgs,
) -> S::Node {
    args.plain = true;
    if args.simple_latex {
        args.text = translate_latex(&args.text);
    }

    let (text, source) = match args.font.symbol {
        Some(font) => (
            replace_symbols(&args.text, font),
            Some(SymbolSource {
                text: args.text.clone(),
                font,
            }),
        ),
        None => (args.text.clone(), None),
    };

    let run = TextRun {
        text,
        x: None,
        y: None,
        fill: args.color.clone(),
        font_size: round(args.font_size).max(1.0),
        source,
    };
    let elem = sink.append_text(node, run);
    args.font.apply(sink, elem);

    let measured = if options.approx_text_size || args.fast {
        None
    } else {
        sink.measure_text(elem)
    };
    let (width, height) = match measured {
        Some(extent) => (extent.width, extent.height),
        None => (
            approximate_label_width(&args.text, &args.font, Some(args.font_size)),
            args.font_size * 1.2,
        ),
    };
    args.text_rect = Some(BoundingRect::new(0.0, -0.8 * height, width, 0.2 * height));

    elem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_font_letters_become_greek() {
        assert_eq!(replace_symbols("abg", SymbolFont::Symbol), "αβγ");
        assert_eq!(replace_symbols("W", SymbolFont::Symbol), "Ω");
    }

    #[test]
    fn unmapped_characters_are_kept() {
        // '!' maps to 0, space is below the table
        assert_eq!(replace_symbols("! x", SymbolFont::Symbol), "! ξ");
        assert_eq!(replace_symbols("\u{4E2D}", SymbolFont::Symbol), "\u{4E2D}");
    }

    #[test]
    fn wingdings_reach_beyond_the_bmp() {
        assert_eq!(replace_symbols("!", SymbolFont::Wingdings), "\u{1F589}");
    }

    #[test]
    fn ttf_codes() {
        // alpha is the first greek entry
        assert_eq!(remap_symbol_ttf_code(0x3B1), 97);
        // the Symbol font map wins for letters it covers
        assert_eq!(remap_symbol_ttf_code(0x391), 65);
        assert_eq!(remap_symbol_ttf_code(0x2200), 34);
        assert_eq!(remap_symbol_ttf_code('x' as u32), 'x' as u32);
    }

    #[test]
    fn plain_detection() {
        assert!(is_plain_text("E = mc^2"));
        assert!(is_plain_text(""));
        assert!(!is_plain_text("#alpha"));
        assert!(!is_plain_text("x_{1}"));
    }
}
