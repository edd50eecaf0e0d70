//! Canvas 2D drawing surface (browser only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::surface::{DrawSurface, Rgba, css_color};

/// A `<canvas>` element and its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap a canvas element. `None` if a 2D context is unavailable.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// Look up a canvas by element id
    pub fn from_element_id(id: &str) -> Option<Self> {
        let canvas = web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .clear_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&css_color(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }
}
