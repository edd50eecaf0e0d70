//! Browser host bindings
//!
//! Exposes the particle loop to JavaScript. Frames come from
//! `requestAnimationFrame`; updates are handed back to a JS callback as
//! `[{ boundingBox: [x1, y1, x2, y2], damage }]`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::driver::{
    CancelHandle, FrameCallback, FrameDriver, FrameLoop, FrameScheduler, Host, SharedArena,
};
use crate::encounter::Encounter;
use crate::error::RenderError;
use crate::renderer::{CanvasSurface, GpuSurface, QuadRenderState};
use crate::settings::DriverSettings;
use crate::sim::{BoundingBox, ParticleUpdate};
use crate::surface::{DrawSurface, Rgba};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// `requestAnimationFrame`-backed scheduler
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn schedule(&self, frame: FrameCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        let guard = handle.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            if !guard.is_cancelled() {
                frame();
            }
        });

        match web_sys::window() {
            Some(window) => {
                if window
                    .request_animation_frame(callback.unchecked_ref())
                    .is_err()
                {
                    log::warn!("requestAnimationFrame failed");
                    handle.cancel();
                }
            }
            None => {
                log::warn!("No window to request frames from");
                handle.cancel();
            }
        }
        handle
    }
}

/// Whichever surface the page gave us
pub enum WebSurface {
    Canvas(CanvasSurface),
    Gpu(GpuSurface),
}

impl DrawSurface for WebSurface {
    fn size(&self) -> (u32, u32) {
        match self {
            WebSurface::Canvas(s) => s.size(),
            WebSurface::Gpu(s) => s.size(),
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        match self {
            WebSurface::Canvas(s) => s.clear_rect(x, y, width, height),
            WebSurface::Gpu(s) => s.clear_rect(x, y, width, height),
        }
    }

    fn set_fill_color(&mut self, color: Rgba) {
        match self {
            WebSurface::Canvas(s) => s.set_fill_color(color),
            WebSurface::Gpu(s) => s.set_fill_color(color),
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        match self {
            WebSurface::Canvas(s) => s.fill_rect(x, y, width, height),
            WebSurface::Gpu(s) => s.fill_rect(x, y, width, height),
        }
    }

    fn present(&mut self) {
        match self {
            WebSurface::Canvas(s) => s.present(),
            WebSurface::Gpu(s) => s.present(),
        }
    }
}

impl WebSurface {
    /// Match the backing store to new canvas dimensions
    fn resize(&mut self, width: u32, height: u32) {
        match self {
            WebSurface::Canvas(s) => {
                s.canvas().set_width(width);
                s.canvas().set_height(height);
            }
            WebSurface::Gpu(s) => s.resize(width, height),
        }
    }
}

/// Arena placement set from JS, updates forwarded to a JS callback
pub struct JsHost {
    arena: SharedArena,
    on_update: js_sys::Function,
}

impl Host for JsHost {
    fn arena(&self) -> BoundingBox {
        self.arena.get()
    }

    fn on_update(&mut self, updates: &[ParticleUpdate]) {
        let payload = match serde_json::to_string(updates) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode updates: {}", e);
                return;
            }
        };
        match js_sys::JSON::parse(&payload) {
            Ok(value) => {
                if let Err(e) = self.on_update.call1(&JsValue::NULL, &value) {
                    log::warn!("onUpdate threw: {:?}", e);
                }
            }
            Err(e) => log::error!("Failed to decode updates: {:?}", e),
        }
    }
}

/// Particle loop handle for the page
#[wasm_bindgen]
pub struct DodgingParticles {
    frame_loop: FrameLoop<WebSurface, JsHost, RafScheduler>,
    arena: SharedArena,
}

#[wasm_bindgen]
impl DodgingParticles {
    /// Build from an encounter JSON document. Drawing starts on `start()`.
    ///
    /// A missing canvas is not an error: frames are skipped until
    /// `attachCanvas` succeeds.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        encounter_json: &str,
        on_update: js_sys::Function,
    ) -> Result<DodgingParticles, JsValue> {
        let surface = CanvasSurface::from_element_id(canvas_id).map(WebSurface::Canvas);
        if surface.is_none() {
            log::warn!("Canvas #{} not available yet", canvas_id);
        }
        Self::build(surface, encounter_json, on_update)
    }

    /// Move/resize the arena; picked up on the next frame. Safe to call from
    /// inside the `onUpdate` callback.
    #[wasm_bindgen(js_name = setBoundingBox)]
    pub fn set_bounding_box(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.arena.set(BoundingBox::new(x1, y1, x2, y2));
    }

    /// Resize the drawing surface after the page resized its canvas
    pub fn resize(&self, width: u32, height: u32) {
        self.frame_loop.with_driver(|d| {
            if let Some(surface) = d.surface_mut() {
                surface.resize(width, height);
            }
        });
    }

    /// Apply settings JSON and remember it in LocalStorage
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, settings_json: &str) -> Result<(), JsValue> {
        let settings = DriverSettings::from_json(settings_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.frame_loop.with_driver(|d| d.set_settings(settings));
        Ok(())
    }

    /// Attach (or replace) the canvas. Returns false if it has no 2D context.
    #[wasm_bindgen(js_name = attachCanvas)]
    pub fn attach_canvas(&self, canvas_id: &str) -> bool {
        match CanvasSurface::from_element_id(canvas_id) {
            Some(surface) => {
                self.frame_loop
                    .with_driver(|d| d.attach_surface(WebSurface::Canvas(surface)));
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = detachCanvas)]
    pub fn detach_canvas(&self) {
        self.frame_loop.with_driver(|d| d.detach_surface());
    }

    pub fn start(&self) {
        self.frame_loop.start();
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }
}

impl DodgingParticles {
    fn build(
        surface: Option<WebSurface>,
        encounter_json: &str,
        on_update: js_sys::Function,
    ) -> Result<DodgingParticles, JsValue> {
        let encounter =
            Encounter::from_json(encounter_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut driver = FrameDriver::new(encounter.particles, DriverSettings::load());
        if let Some(surface) = surface {
            driver.attach_surface(surface);
        }
        let arena = SharedArena::new(encounter.bounding_box);
        let host = Rc::new(RefCell::new(JsHost {
            arena: arena.clone(),
            on_update,
        }));
        Ok(DodgingParticles {
            frame_loop: FrameLoop::new(driver, host, RafScheduler),
            arena,
        })
    }
}

/// Like `new DodgingParticles(...)` but draws through WebGPU
#[wasm_bindgen(js_name = createWebGpuParticles)]
pub async fn create_webgpu_particles(
    canvas_id: String,
    encounter_json: String,
    on_update: js_sys::Function,
) -> Result<DodgingParticles, JsValue> {
    let canvas: web_sys::HtmlCanvasElement = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&canvas_id))
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no canvas #{canvas_id}")))?;

    let surface = init_webgpu(canvas)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    DodgingParticles::build(Some(WebSurface::Gpu(surface)), &encounter_json, on_update)
}

async fn init_webgpu(canvas: web_sys::HtmlCanvasElement) -> Result<GpuSurface, RenderError> {
    let (width, height) = (canvas.width(), canvas.height());

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let state = QuadRenderState::new(surface, &adapter, width, height).await?;
    Ok(GpuSurface::new(state))
}
