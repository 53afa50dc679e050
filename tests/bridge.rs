use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use glam::dvec2;
use tlatex::bridge::{
    HorizontalAlign, MathJaxArgs, MathJaxBridge, TexDialect, TexOptions, TexRenderer, VerticalAlign,
};
use tlatex::{BridgeError, FontHandler, RootPalette};

const RENDERED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4.5ex" height="2.009ex" style="vertical-align: -0.505ex;" viewBox="0 -750 1989 888"><g stroke="currentColor"><path d="M0 0h10"/></g></svg>"#;

#[derive(Default)]
struct FakeMathJax {
    loads: AtomicUsize,
    broken: bool,
    seen: Mutex<Vec<(String, TexOptions)>>,
}

impl FakeMathJax {
    fn broken() -> Self {
        FakeMathJax {
            broken: true,
            ..Default::default()
        }
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<(String, TexOptions)> {
        self.seen.lock().unwrap().clone()
    }
}

impl TexRenderer for FakeMathJax {
    async fn load(&self) -> Result<(), BridgeError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        if self.broken {
            return Err(BridgeError::Load {
                message: "mathjax bundle not found".into(),
            });
        }
        Ok(())
    }

    async fn tex_to_svg(&self, tex: &str, options: &TexOptions) -> Result<String, BridgeError> {
        self.seen
            .lock()
            .unwrap()
            .push((tex.to_string(), options.clone()));
        if tex.is_empty() {
            return Err(BridgeError::Render {
                message: "empty expression".into(),
            });
        }
        Ok(RENDERED.to_string())
    }
}

fn label(text: &str) -> MathJaxArgs {
    MathJaxArgs::new(text, FontHandler::new(42, 20.0))
}

#[tokio::test]
async fn concurrent_labels_share_one_load() {
    let bridge = MathJaxBridge::new(FakeMathJax::default());
    assert!(!bridge.is_loaded());

    let mut a = label("#alpha");
    let mut b = label("#frac{1}{2}");
    let mut c = label("x^{2}");
    let (ra, rb, rc) = tokio::join!(
        bridge.produce(&mut a, &RootPalette),
        bridge.produce(&mut b, &RootPalette),
        bridge.produce(&mut c, &RootPalette)
    );
    assert!(ra.is_ok() && rb.is_ok() && rc.is_ok());
    assert_eq!(bridge.renderer().loads(), 1);
    assert!(bridge.is_loaded());

    bridge.produce(&mut label("y"), &RootPalette).await.unwrap();
    assert_eq!(bridge.renderer().loads(), 1);
    assert_eq!(bridge.renderer().seen().len(), 4);
}

#[tokio::test]
async fn markup_is_translated_before_rendering() {
    let bridge = MathJaxBridge::new(FakeMathJax::default());

    let mut args = label("#frac{#alpha}{#beta}");
    args.color = Some("red".into());
    bridge.produce(&mut args, &RootPalette).await.unwrap();

    let mut args = label(r"\vec");
    args.dialect = TexDialect::Tex;
    bridge.produce(&mut args, &RootPalette).await.unwrap();

    let seen = bridge.renderer().seen();
    assert_eq!(seen[0].0, r"\color{red}{\frac{\alpha}{\beta}}");
    assert_eq!(seen[1].0, r"\unicode{0x2192}");

    let options = &seen[0].1;
    assert_eq!(options.em, 20.0);
    assert_eq!(options.ex, 10.0);
    assert!(options.container_width < 0.0);
}

#[tokio::test]
async fn load_failure_reaches_every_label() {
    let bridge = MathJaxBridge::new(FakeMathJax::broken());

    let mut a = label("#alpha");
    let mut b = label("#beta");
    let (ra, rb) = tokio::join!(
        bridge.produce(&mut a, &RootPalette),
        bridge.produce(&mut b, &RootPalette)
    );
    assert!(matches!(ra, Err(BridgeError::Load { .. })));
    assert!(matches!(rb, Err(BridgeError::Load { .. })));
    assert_eq!(bridge.renderer().loads(), 1);
    assert!(!bridge.is_loaded());
    assert!(bridge.renderer().seen().is_empty());

    // a failed load is retried by the next label
    let retry = bridge.produce(&mut label("#gamma"), &RootPalette).await;
    assert!(retry.is_err());
    assert_eq!(bridge.renderer().loads(), 2);
}

#[tokio::test]
async fn render_errors_are_passed_through() {
    let bridge = MathJaxBridge::new(FakeMathJax::default());
    let err = bridge.produce(&mut label(""), &RootPalette).await.unwrap_err();
    assert!(matches!(err, BridgeError::Render { .. }));
}

#[tokio::test]
async fn graphic_is_sized_and_aligned_in_its_box() {
    let bridge = MathJaxBridge::new(FakeMathJax::default());

    let mut args = label("E = mc^{2}");
    args.placement.position = dvec2(10.0, 10.0);
    args.placement.size = dvec2(100.0, 40.0);
    args.placement.align = (HorizontalAlign::Middle, VerticalAlign::Middle);

    let mut svg = bridge.produce(&mut args, &RootPalette).await.unwrap();
    assert_eq!(svg.size, dvec2(45.0, 20.0));
    assert_eq!(svg.svg.attr("width"), Some("45"));
    assert_eq!(svg.svg.attr("style"), None);
    assert!(svg.scale_factor.is_none());
    let valign = args.placement.valign.unwrap();
    assert!((valign + 5.05).abs() < 1e-9);

    svg.place(&mut args, 20.0, 0.0);
    assert_eq!(args.placement.position, dvec2(37.5, 20.0));
    assert_eq!(svg.transform.as_deref(), Some("translate(37.5,20)"));

    let markup = svg.to_markup();
    assert!(markup.starts_with(r#"<g transform="translate(37.5,20)"><svg"#));
    assert!(markup.contains(r#"<path d="M0 0h10"/>"#));
    assert!(markup.ends_with("</svg></g>"));
}

#[tokio::test]
async fn oversized_graphic_reports_a_scale_factor() {
    let bridge = MathJaxBridge::new(FakeMathJax::default());

    let mut args = label("#sum_{i} x_{i}");
    args.scale = true;
    args.placement.size = dvec2(30.0, 40.0);

    let svg = bridge.produce(&mut args, &RootPalette).await.unwrap();
    assert_eq!(svg.scale_factor, Some(1.5));
}
