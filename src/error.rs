//! Error types for loading encounters, settings and GPU resources.
//!
//! The frame loop itself never fails; these only come from the outer layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or parsing a JSON document (encounter or settings)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// WebGPU setup failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
