use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use tlatex::{FontHandler, render_to_svg, translate_latex};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  gallery-html    Render every markup fixture into one HTML page");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "gallery-html" => gallery_html(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

struct Rendered {
    name: String,
    source: String,
    unicode: String,
    /// Expected to be rejected
    expect_error: bool,
    output: Result<String, String>,
}

impl Rendered {
    fn is_as_expected(&self) -> bool {
        self.output.is_err() == self.expect_error
    }
}

fn collect_fixtures(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut paths: Vec<_> = dir
        .read_dir_utf8()
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.extension() == Some("tlx"))
                .collect()
        })
        .unwrap_or_default();
    paths.sort();
    paths
}

fn render_fixture(path: &Utf8Path, expect_error: bool) -> Rendered {
    let name = path.file_stem().unwrap_or_default().to_string();
    eprintln!("Processing {}...", name);

    let source = fs::read_to_string(path)
        .unwrap_or_default()
        .trim_end()
        .to_string();
    let output =
        render_to_svg(&source, FontHandler::new(42, 28.0)).map_err(|e| format!("Error: {}", e));

    Rendered {
        name,
        unicode: translate_latex(&source),
        source,
        expect_error,
        output,
    }
}

fn gallery_html() {
    let root = Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask lives inside the workspace")
        .to_path_buf();
    let fixtures = root.join("tests/fixtures");
    let output_path = root.join("gallery.html");

    let mut jobs: Vec<(Utf8PathBuf, bool)> = collect_fixtures(&fixtures.join("ok"))
        .into_iter()
        .map(|p| (p, false))
        .collect();
    jobs.extend(collect_fixtures(&fixtures.join("err")).into_iter().map(|p| (p, true)));

    let results: Vec<Rendered> = jobs
        .par_iter()
        .map(|(path, expect_error)| render_fixture(path, *expect_error))
        .collect();

    let total = results.len();
    let passed = results.iter().filter(|r| r.is_as_expected()).count();

    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>TLatex Gallery</title>
    <style>
        * {{
            box-sizing: border-box;
        }}
        body {{
            font-family: system-ui, sans-serif;
            margin: 0;
            padding: 0;
            background: #eee;
            color: #333;
        }}
        .page {{
            max-width: 1000px;
            margin: 0 auto;
            padding: 24px;
        }}
        h1 {{
            font-weight: 600;
            font-size: 20px;
            margin: 0 0 8px 0;
        }}
        .summary {{
            font-size: 12px;
            color: #666;
            margin-bottom: 24px;
        }}
        .card {{
            background: white;
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.08);
            margin-bottom: 16px;
            overflow: hidden;
        }}
        .card-header {{
            display: flex;
            align-items: center;
            justify-content: space-between;
            padding: 12px 16px;
            border-bottom: 1px solid #eee;
            background: #fafafa;
            font-size: 13px;
            font-weight: 600;
        }}
        .status {{
            font-size: 11px;
            padding: 3px 8px;
            border-radius: 4px;
        }}
        .status.ok {{
            background: #dcfce7;
            color: #166534;
        }}
        .status.unexpected {{
            background: #fee2e2;
            color: #991b1b;
        }}
        .card-body {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 12px;
            padding: 12px 16px;
        }}
        .svg-container {{
            padding: 12px;
            background: #fafafa;
            min-height: 60px;
            display: flex;
            align-items: center;
            justify-content: center;
        }}
        .mono {{
            font-family: 'SF Mono', Monaco, monospace;
            font-size: 11px;
            white-space: pre-wrap;
        }}
        .error {{
            color: #991b1b;
            background: #fef2f2;
            padding: 12px;
        }}
    </style>
</head>
<body>
<div class="page">
<h1>TLatex Gallery</h1>
<div class="summary">{} / {} fixtures behave as expected</div>
"#,
        passed, total
    ));

    for result in &results {
        let (status_class, status_text) = if result.is_as_expected() {
            ("ok", if result.expect_error { "REJECTED" } else { "OK" })
        } else {
            ("unexpected", "UNEXPECTED")
        };
        let drawn = match &result.output {
            Ok(svg) => svg.clone(),
            Err(e) => format!(r#"<div class="mono error">{}</div>"#, html_escape(e)),
        };

        html.push_str(&format!(
            r#"
<div class="card" id="{}">
    <div class="card-header">
        <span>{}</span>
        <span class="status {}">{}</span>
    </div>
    <div class="card-body">
        <div class="svg-container">{}</div>
        <div>
            <div class="mono">{}</div>
            <div class="mono">{}</div>
        </div>
    </div>
</div>
"#,
            result.name,
            result.name,
            status_class,
            status_text,
            drawn,
            html_escape(&result.source),
            html_escape(&result.unicode),
        ));
    }

    html.push_str("</div>\n</body></html>");

    fs::write(&output_path, html).expect("Failed to write HTML");
    println!("Generated gallery at: {}", output_path);
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
