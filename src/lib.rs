//! Dodging Particles - hazard sprites for battle encounters
//!
//! Core modules:
//! - `sim`: Particle motion and arena geometry (pure, no rendering)
//! - `driver`: Frame driver, scheduling and update publishing
//! - `renderer`: Drawing surfaces (CPU quad batch, WebGPU, canvas 2D)
//! - `encounter`: Particle definitions for a battle, loaded or generated
//! - `settings`: Driver preferences

pub mod driver;
pub mod encounter;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{FrameDriver, FrameLoop, Host};
pub use encounter::Encounter;
pub use error::LoadError;
pub use settings::DriverSettings;
pub use sim::{Behaviour, BoundingBox, ParticleDef, ParticleUpdate};
pub use surface::{DrawSurface, Rgba};

/// Engine configuration constants
pub mod consts {
    /// Direction value the driver hands to the motion step every frame.
    /// The step accepts it but displacement comes from the particle speed alone.
    pub const FRAME_DIRECTION: f32 = 10.0;

    /// Fallback drawing surface size (pixels)
    pub const DEFAULT_SURFACE_WIDTH: u32 = 800;
    pub const DEFAULT_SURFACE_HEIGHT: u32 = 600;

    /// Particle fill colour (white)
    pub const PARTICLE_FILL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Advance `current` toward `target` by at most `step` (magnitude).
///
/// Lands exactly on `target` once it is within reach, so
/// `interpolate(x, x + speed, speed)` is always exactly `x + speed`.
#[inline]
pub fn interpolate(current: f32, target: f32, step: f32) -> f32 {
    let delta = target - current;
    let step = step.abs();
    if delta.abs() <= step {
        target
    } else {
        current + step.copysign(delta)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: with an inverted range
/// (`max < min`) the result is `max`.
#[inline]
pub fn limit(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
