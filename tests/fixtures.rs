use camino::Utf8PathBuf;
use datatest_stable::Utf8Path;
use tlatex::{
    FontHandler, RenderOptions, RootPalette, SvgCanvas, TextArgs, produce_latex, translate_latex,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn read_markup(path: &Utf8Path) -> datatest_stable::Result<String> {
    let source = std::fs::read_to_string(path)?;
    Ok(source.trim_end_matches(['\n', '\r']).to_string())
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(expected: &str, actual: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::from("Legend: [-expected only-] [+actual only+]\n");
    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }
    output
}

fn lay_out(markup: &str) -> (SvgCanvas, Result<TextArgs, tlatex::LayoutError>) {
    let mut canvas = SvgCanvas::new();
    let root = canvas.root();
    let mut args = TextArgs::new(markup, FontHandler::new(42, 24.0));
    let result = produce_latex(&mut canvas, &RootPalette, &RenderOptions::default(), root, &mut args);
    (canvas, result.map(|()| args))
}

/// Markup under `ok/` lays out, serializes and, when an `.expected` file
/// sits next to it, translates to exactly that text.
fn test_layout_ok(path: &Utf8Path) -> datatest_stable::Result<()> {
    init_tracing();
    let _span = tracing::info_span!("fixture", %path).entered();
    let markup = read_markup(path)?;

    let (canvas, result) = lay_out(&markup);
    let args = match result {
        Ok(args) => args,
        Err(e) => panic!("layout failed for {}: {:?}", path, miette::Report::new(e)),
    };
    let rect = args.text_rect.unwrap_or_default();
    assert!(
        rect.width() > 0.0 && rect.height() > 0.0,
        "empty area for {}: {:?}",
        path,
        rect
    );
    assert!(!canvas.texts().is_empty(), "no text runs for {}", path);

    let svg = canvas
        .to_svg_document(Some(&rect))
        .map_err(|e| format!("serialization failed for {path}: {e:?}"))?;
    assert!(svg.contains("viewBox"), "no viewBox in output for {}", path);

    let expected_path: Utf8PathBuf = path.with_extension("expected");
    if expected_path.exists() {
        let expected = read_markup(&expected_path)?;
        let actual = translate_latex(&markup);
        if actual != expected {
            panic!(
                "translation mismatch for {}:\n{}",
                path,
                format_inline_diff(&expected, &actual)
            );
        }
    }

    Ok(())
}

/// Markup under `err/` is rejected.
fn test_layout_err(path: &Utf8Path) -> datatest_stable::Result<()> {
    init_tracing();
    let _span = tracing::info_span!("fixture", %path).entered();
    let markup = read_markup(path)?;

    let (_, result) = lay_out(&markup);
    if let Ok(args) = result {
        panic!("{} laid out without error: {:?}", path, args.text_rect);
    }

    Ok(())
}

datatest_stable::harness! {
    { test = test_layout_ok, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/ok"), pattern = r"\.tlx$" },
    { test = test_layout_err, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/err"), pattern = r"\.tlx$" },
}
