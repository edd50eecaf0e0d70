//! Per-frame particle motion
//!
//! Advances particle positions in arena-local space. Pure: nothing here
//! touches the drawing surface or the host.

use super::bounds::BoundingBox;
use super::particle::ParticleDef;
use crate::{interpolate, limit};

/// Move one particle by a single frame.
///
/// Both axes advance by `particle.speed`, then the top-left corner is clamped
/// so the whole particle stays inside the arena's local extent. There is no
/// reflection at the edges: a fast particle simply pins to the boundary.
///
/// `direction` is accepted for the driver's benefit and has no effect on the
/// result.
pub fn move_particle(
    position: &BoundingBox,
    _direction: f32,
    arena: &BoundingBox,
    particle: &ParticleDef,
) -> BoundingBox {
    let extent = arena.local_extent();
    let speed = particle.speed;
    let (x, y) = (position.x1, position.y1);

    let new_x = limit(interpolate(x, x + speed, speed), 0.0, extent.x2 - particle.width);
    let new_y = limit(interpolate(y, y + speed, speed), 0.0, extent.y2 - particle.height);

    BoundingBox::new(new_x, new_y, new_x + particle.width, new_y + particle.height)
}

/// Advance every particle in place, index-aligned with `particles`
pub fn step_particles(
    positions: &mut [BoundingBox],
    particles: &[ParticleDef],
    direction: f32,
    arena: &BoundingBox,
) {
    for (position, particle) in positions.iter_mut().zip(particles) {
        *position = move_particle(position, direction, arena, particle);
    }
}
