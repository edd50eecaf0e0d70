//! Particle simulation module
//!
//! Geometry and motion for arena hazards. Everything in here is pure:
//! - Local (arena-relative) positions in, local positions out
//! - Arena placement only enters through `BoundingBox::to_world`
//! - No rendering, scheduling or host dependencies

pub mod bounds;
pub mod motion;
pub mod particle;

pub use bounds::BoundingBox;
pub use motion::{move_particle, step_particles};
pub use particle::{Behaviour, ParticleDef, ParticleUpdate, initial_positions};
