//! Approximate glyph widths for when text cannot be measured.
//!
//! Widths are in thousandths of the font's average glyph width.

use crate::font::FontHandler;

/// Relative widths of the printable ASCII range, starting at the space
#[rustfmt::skip]
static BASE_WIDTHS: [u16; 95] = [
    453, 535, 661, 973, 955, 1448, 1242, 324, 593, 596, 778, 1011,
    200, 570, 200, 492, 947, 885, 947, 947, 947, 947, 947, 947,
    947, 947, 511, 495, 980, 1010, 987, 893, 1624, 1185, 1147, 1193,
    1216, 1080, 1028, 1270, 1274, 531, 910, 1177, 1004, 1521, 1252, 1276,
    1111, 1276, 1164, 1056, 1073, 1215, 1159, 1596, 1150, 1124, 1065, 540,
    591, 540, 837, 874, 572, 929, 972, 879, 973, 901, 569, 967,
    973, 453, 458, 903, 453, 1477, 973, 970, 972, 976, 638, 846,
    548, 973, 870, 1285, 884, 864, 835, 656, 430, 656, 1069,
];

/// Relative widths of accented, greek and symbol code points, sorted by code
#[rustfmt::skip]
static EXTRA_WIDTHS: &[(u16, u16)] = &[
    (169, 1339),
    (172, 1033),
    (174, 1339),
    (175, 883),
    (177, 955),
    (183, 519),
    (215, 995),
    (229, 929),
    (247, 977),
    (295, 984),
    (402, 811),
    (710, 695),
    (729, 522),
    (732, 692),
    (913, 1194),
    (914, 1153),
    (915, 1016),
    (916, 1178),
    (917, 1086),
    (918, 1067),
    (919, 1275),
    (920, 1285),
    (921, 539),
    (922, 1189),
    (923, 1170),
    (924, 1523),
    (925, 1253),
    (926, 1092),
    (927, 1281),
    (928, 1281),
    (929, 1102),
    (931, 1041),
    (932, 1069),
    (933, 1135),
    (934, 1358),
    (935, 1162),
    (936, 1334),
    (937, 1279),
    (945, 1002),
    (946, 996),
    (947, 847),
    (948, 953),
    (949, 834),
    (950, 825),
    (951, 989),
    (952, 954),
    (953, 516),
    (954, 951),
    (955, 913),
    (956, 1003),
    (957, 862),
    (958, 803),
    (959, 967),
    (960, 1070),
    (961, 973),
    (962, 848),
    (963, 1017),
    (964, 797),
    (965, 944),
    (966, 1149),
    (967, 917),
    (968, 1232),
    (969, 1359),
    (977, 995),
    (978, 1154),
    (982, 1354),
    (8226, 626),
    (8230, 1552),
    (8243, 680),
    (8260, 476),
    (8465, 1002),
    (8472, 1493),
    (8476, 1490),
    (8482, 1469),
    (8491, 1150),
    (8501, 1095),
    (8592, 1761),
    (8593, 895),
    (8594, 1761),
    (8595, 895),
    (8596, 1768),
    (8629, 1454),
    (8656, 1496),
    (8657, 1447),
    (8658, 1496),
    (8659, 1447),
    (8660, 1768),
    (8704, 1397),
    (8706, 916),
    (8707, 1170),
    (8709, 1205),
    (8711, 1551),
    (8712, 1426),
    (8713, 1426),
    (8719, 1364),
    (8721, 1182),
    (8730, 986),
    (8733, 1124),
    (8734, 1453),
    (8736, 1608),
    (8741, 737),
    (8743, 1383),
    (8744, 1383),
    (8745, 1276),
    (8746, 1404),
    (8747, 480),
    (8776, 976),
    (8800, 969),
    (8801, 1031),
    (8804, 940),
    (8805, 947),
    (8834, 1426),
    (8835, 1426),
    (8836, 1426),
    (8838, 1426),
    (8839, 1426),
    (8853, 1417),
    (8855, 1417),
    (8857, 1421),
    (8869, 1390),
    (8901, 524),
    (8970, 749),
    (9115, 882),
    (9117, 882),
    (9127, 1322),
    (9128, 1322),
    (9144, 1000),
    (9725, 1780),
    (9744, 1581),
    (9824, 965),
    (9827, 1170),
    (9829, 1067),
    (9830, 931),
    (10003, 1477),
];

const UNKNOWN_WIDTH: u16 = 1000;

/// Relative width of one UTF-16 code unit.
fn unit_width(code: u16) -> u16 {
    match code {
        32..=126 => BASE_WIDTHS[usize::from(code - 32)],
        _ => EXTRA_WIDTHS
            .binary_search_by_key(&code, |&(c, _)| c)
            .map(|idx| EXTRA_WIDTHS[idx].1)
            .unwrap_or(UNKNOWN_WIDTH),
    }
}

/// Estimate the rendered width of `label` in pixels.
///
/// `size` overrides the font size when given. Fixed-pitch fonts use the
/// average width for every glyph; others sum the per-glyph table.
pub fn approximate_label_width(label: &str, font: &FontHandler, size: Option<f64>) -> f64 {
    let symbol_width = size.filter(|s| *s != 0.0).unwrap_or(font.size) * font.aver_width;

    if font.is_monospace() {
        return label.encode_utf16().count() as f64 * symbol_width;
    }

    let sum: u32 = label.encode_utf16().map(|u| u32::from(unit_width(u))).sum();
    f64::from(sum) / 1000.0 * symbol_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_table_is_sorted() {
        assert!(EXTRA_WIDTHS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn ascii_uses_base_table() {
        let font = FontHandler::new(42, 10.0);
        // 'x' = 884 thousandths
        let w = approximate_label_width("x", &font, None);
        assert!((w - 0.884 * 10.0 * font.aver_width).abs() < 1e-9);
    }

    #[test]
    fn unknown_glyphs_weigh_one_average_width() {
        let font = FontHandler::new(42, 10.0);
        let w = approximate_label_width("\u{4E2D}", &font, None);
        assert!((w - 10.0 * font.aver_width).abs() < 1e-9);
    }

    #[test]
    fn monospace_counts_units() {
        let font = FontHandler::new(82, 10.0);
        let w = approximate_label_width("iW", &font, Some(20.0));
        assert!((w - 2.0 * 20.0 * font.aver_width).abs() < 1e-9);
    }

    #[test]
    fn empty_label_has_no_width() {
        assert_eq!(approximate_label_width("", &FontHandler::default(), None), 0.0);
    }
}
