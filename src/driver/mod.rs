//! Frame driver
//!
//! One frame = move every particle, draw it at its world position, then hand
//! the host a batch of world-space hit-boxes and damage values.
//!
//! The driver owns the particle state and the drawing surface. The host owns
//! the arena placement and receives updates; it never sees live state.

pub mod frame_loop;
pub mod scheduler;

pub use frame_loop::FrameLoop;
pub use scheduler::{CancelHandle, FrameCallback, FrameScheduler, ManualScheduler};

use std::cell::Cell;
use std::rc::Rc;

use crate::settings::DriverSettings;
use crate::sim::{BoundingBox, ParticleDef, ParticleUpdate, initial_positions, step_particles};
use crate::surface::DrawSurface;

/// The game side of a run: supplies the arena, consumes updates
pub trait Host {
    /// Arena placement for the frame about to be drawn (world space)
    fn arena(&self) -> BoundingBox;

    /// One batch per drawn frame, index-aligned with the particle definitions
    fn on_update(&mut self, updates: &[ParticleUpdate]);
}

/// Arena placement shared between a host and whatever re-measures the arena.
///
/// Writes never borrow the host, so the arena can be replaced from inside
/// [`Host::on_update`].
#[derive(Debug, Clone)]
pub struct SharedArena(Rc<Cell<BoundingBox>>);

impl SharedArena {
    pub fn new(arena: BoundingBox) -> Self {
        Self(Rc::new(Cell::new(arena)))
    }

    pub fn get(&self) -> BoundingBox {
        self.0.get()
    }

    /// Picked up by the next frame
    pub fn set(&self, arena: BoundingBox) {
        self.0.set(arena);
    }
}

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Created, not yet mounted
    Idle,
    /// Drawing a frame every time it is asked to
    Running,
}

/// Particle state, drawing surface and the per-frame sequence
pub struct FrameDriver<S> {
    particles: Vec<ParticleDef>,
    /// Arena-local boxes, index-aligned with `particles`
    positions: Vec<BoundingBox>,
    surface: Option<S>,
    settings: DriverSettings,
    phase: DriverPhase,
    frames_drawn: u64,
    frames_skipped: u64,
    updates: Vec<ParticleUpdate>,
}

impl<S: DrawSurface> FrameDriver<S> {
    pub fn new(particles: Vec<ParticleDef>, settings: DriverSettings) -> Self {
        let positions = initial_positions(&particles);
        Self {
            updates: Vec::with_capacity(particles.len()),
            particles,
            positions,
            surface: None,
            settings,
            phase: DriverPhase::Idle,
            frames_drawn: 0,
            frames_skipped: 0,
        }
    }

    pub fn with_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Install a drawing surface, returning the previous one
    pub fn attach_surface(&mut self, surface: S) -> Option<S> {
        self.surface.replace(surface)
    }

    /// Remove the drawing surface; frames are skipped until one is attached
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Move from `Idle` to `Running`. Only the first call has any effect.
    pub fn activate(&mut self) -> bool {
        if self.phase == DriverPhase::Running {
            return false;
        }
        self.phase = DriverPhase::Running;
        true
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn particles(&self) -> &[ParticleDef] {
        &self.particles
    }

    /// Current arena-local boxes
    pub fn positions(&self) -> &[BoundingBox] {
        &self.positions
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Replace the settings; takes effect on the next frame
    pub fn set_settings(&mut self, settings: DriverSettings) {
        self.settings = settings;
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Run one frame against the given arena placement.
    ///
    /// Returns the batch to publish, or `None` when nothing was drawn (driver
    /// still idle or no surface). A skipped frame leaves particle state as is.
    pub fn draw(&mut self, arena: &BoundingBox) -> Option<&[ParticleUpdate]> {
        if self.phase == DriverPhase::Idle {
            return None;
        }

        let Self {
            particles,
            positions,
            surface,
            settings,
            updates,
            ..
        } = self;

        let Some(surface) = surface.as_mut() else {
            self.frames_skipped += 1;
            log::debug!("No drawing surface, skipping frame");
            return None;
        };

        surface.set_fill_color(settings.fill_color);
        surface.clear();

        step_particles(positions, particles, settings.direction, arena);

        updates.clear();
        for (position, particle) in positions.iter().zip(particles.iter()) {
            let world = position.to_world(arena);
            surface.fill_rect(world.x1, world.y1, particle.width, particle.height);
            updates.push(ParticleUpdate {
                bounding_box: world,
                damage: particle.damage,
            });
        }
        surface.present();

        self.frames_drawn += 1;
        if self.settings.log_updates {
            log::debug!("Frame {}: {:?}", self.frames_drawn, self.updates);
        } else {
            log::trace!("Frame {}: {} updates", self.frames_drawn, self.updates.len());
        }
        Some(&self.updates)
    }
}
