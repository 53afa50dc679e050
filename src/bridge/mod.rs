//! Bridge to an external TeX renderer such as MathJax.
//!
//! Labels the native engine should not lay out itself are translated to TeX
//! ([`translate_math`]), rendered by a [`TexRenderer`] into SVG, and the
//! result is resized and aligned so it composes with natively drawn text.
//! The renderer is loaded lazily, once, however many labels ask for it at
//! the same time.

pub mod loader;
pub mod repair;
pub mod translate;

use std::future::Future;

use glam::DVec2;

use crate::errors::BridgeError;
use crate::font::{FontHandler, StyleProvider};
use crate::log::debug;
use crate::sink::TextExtent;

pub use loader::SingleFlight;
pub use repair::{HorizontalAlign, Placement, SvgFragment, VerticalAlign};
pub use translate::{TexDialect, translate_math};

/// Conversion options passed with every expression
#[derive(Debug, Clone, PartialEq)]
pub struct TexOptions {
    /// Pixels per em
    pub em: f64,
    /// Pixels per ex
    pub ex: f64,
    pub family: String,
    pub scale: f64,
    /// Negative: no container to wrap in
    pub container_width: f64,
    pub line_width: f64,
}

impl TexOptions {
    pub fn for_font(font: &FontHandler) -> Self {
        TexOptions {
            em: font.size,
            ex: font.size / 2.0,
            family: font.name.clone(),
            scale: 1.0,
            container_width: -1.0,
            line_width: 100000.0,
        }
    }
}

/// An external TeX-to-SVG converter
pub trait TexRenderer: Send + Sync {
    /// One-time startup; only ever called by one caller at a time.
    fn load(&self) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Convert one expression to SVG markup.
    fn tex_to_svg(
        &self,
        tex: &str,
        options: &TexOptions,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send;

    /// Extent of a converted graphic as drawn, when the renderer lives in a
    /// document that can measure it.
    fn measure(&self, _svg: &SvgFragment) -> Option<TextExtent> {
        None
    }
}

/// One label to typeset externally
#[derive(Debug, Clone, PartialEq)]
pub struct MathJaxArgs {
    pub text: String,
    pub dialect: TexDialect,
    pub color: Option<String>,
    pub font: FontHandler,
    pub placement: Placement,
    /// Shrink the surrounding drawing when the graphic overflows its box
    pub scale: bool,
}

impl MathJaxArgs {
    pub fn new(text: impl Into<String>, font: FontHandler) -> Self {
        MathJaxArgs {
            text: text.into(),
            dialect: TexDialect::Root,
            color: None,
            font,
            placement: Placement::default(),
            scale: false,
        }
    }
}

/// A converted graphic, sized in pixels and waiting to be placed
#[derive(Debug, Clone, PartialEq)]
pub struct MathJaxSvg {
    pub svg: SvgFragment,
    /// Drawn size in pixels
    pub size: DVec2,
    /// Factor the caller's text drawing should be scaled by, if requested
    pub scale_factor: Option<f64>,
    /// Transform of the container once placed
    pub transform: Option<String>,
}

impl MathJaxSvg {
    /// Align the graphic inside `args.placement`.
    ///
    /// `svg_factor` is the ratio between the graphic's own pixels and the
    /// drawing's, zero when they agree.
    pub fn place(&mut self, args: &mut MathJaxArgs, font_size: f64, svg_factor: f64) {
        self.transform =
            repair::apply_attributes(&mut self.svg, &mut args.placement, font_size, svg_factor);
    }

    /// SVG markup of the graphic inside its positioned container.
    pub fn to_markup(&self) -> String {
        match &self.transform {
            Some(transform) => format!("<g transform=\"{transform}\">{}</g>", self.svg.to_markup()),
            None => format!("<g>{}</g>", self.svg.to_markup()),
        }
    }
}

/// Typesets labels through a lazily loaded [`TexRenderer`]
pub struct MathJaxBridge<R> {
    renderer: R,
    loaded: SingleFlight<()>,
}

impl<R: TexRenderer> MathJaxBridge<R> {
    pub fn new(renderer: R) -> Self {
        MathJaxBridge {
            renderer,
            loaded: SingleFlight::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Load the renderer unless that already happened.
    pub async fn load(&self) -> Result<(), BridgeError> {
        self.loaded.get_or_init(|| self.renderer.load()).await
    }

    /// Convert `args.text` and size the result.
    ///
    /// The graphic's baseline offset is stored in `args.placement.valign`;
    /// call [`MathJaxSvg::place`] to align it.
    pub async fn produce<P: StyleProvider + ?Sized>(
        &self,
        args: &mut MathJaxArgs,
        styles: &P,
    ) -> Result<MathJaxSvg, BridgeError> {
        let tex = translate_math(&args.text, args.dialect, args.color.as_deref(), styles);
        let options = TexOptions::for_font(&args.font);

        self.load().await?;
        debug!(tex = %tex, "typesetting");
        let markup = self.renderer.tex_to_svg(&tex, &options).await?;

        let mut svg = SvgFragment::parse(&markup)?;
        svg.bbox = self.renderer.measure(&svg);
        let repaired = repair::repair_size(&mut svg, args.font.size);
        args.placement.valign = repaired.valign;

        let scale_factor = args
            .scale
            .then(|| (repaired.size / args.placement.size).max_element());

        Ok(MathJaxSvg {
            svg,
            size: repaired.size,
            scale_factor,
            transform: None,
        })
    }
}

impl<R> std::fmt::Debug for MathJaxBridge<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathJaxBridge")
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
