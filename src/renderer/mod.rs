//! Drawing surfaces for particles
//!
//! - `QuadBatch`: CPU recorder, used headless and as the GPU staging buffer
//! - `GpuSurface`: WebGPU quad pipeline
//! - `CanvasSurface` (wasm only): canvas 2D context

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use batch::{Quad, QuadBatch};
pub use pipeline::{GpuSurface, QuadRenderState};
pub use vertex::{Vertex, colors};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
