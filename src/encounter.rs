//! Battle encounters: an arena plus the hazards thrown into it
//!
//! Encounters are the host-side input for a run. They can be loaded from
//! JSON (same wire format the web host uses) or generated from a seed.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::sim::{Behaviour, BoundingBox, ParticleDef};

/// Hazard size range for generated volleys (pixels)
const MIN_HAZARD_SIZE: f32 = 6.0;
const MAX_HAZARD_SIZE: f32 = 24.0;
/// Speed magnitude range for generated volleys (pixels per frame)
const MIN_HAZARD_SPEED: f32 = 0.5;
const MAX_HAZARD_SPEED: f32 = 6.0;
const MAX_HAZARD_DAMAGE: u32 = 12;

/// Arena placement and ordered particle definitions for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Arena in world coordinates at the start of the run
    pub bounding_box: BoundingBox,
    pub particles: Vec<ParticleDef>,
}

impl Encounter {
    pub fn new(bounding_box: BoundingBox, particles: Vec<ParticleDef>) -> Self {
        Self {
            bounding_box,
            particles,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let encounter = Self::from_json(&json)?;
        log::info!(
            "Loaded encounter from {} ({} particles)",
            path.display(),
            encounter.particles.len()
        );
        Ok(encounter)
    }

    /// Deterministic volley of `count` hazards placed inside `arena`.
    ///
    /// Same seed, same arena size, same volley.
    pub fn generate(seed: u64, arena: BoundingBox, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let extent = arena.local_extent();

        let particles = (0..count)
            .map(|i| {
                let size = rng.random_range(MIN_HAZARD_SIZE..=MAX_HAZARD_SIZE);
                let max_x = (extent.x2 - size).max(0.0);
                let max_y = (extent.y2 - size).max(0.0);
                let start = [rng.random_range(0.0..=max_x), rng.random_range(0.0..=max_y)];

                let magnitude = rng.random_range(MIN_HAZARD_SPEED..=MAX_HAZARD_SPEED);
                let speed = if rng.random_bool(0.5) { magnitude } else { -magnitude };
                let damage = rng.random_range(1..=MAX_HAZARD_DAMAGE) as f32;

                let def = ParticleDef::new(size, size, start, speed, damage);
                // Every fourth hazard carries a waypoint list for future path motion
                if i % 4 == 3 {
                    let points = (0..4)
                        .flat_map(|_| [rng.random_range(0.0..=max_x), rng.random_range(0.0..=max_y)])
                        .collect();
                    def.with_behaviour(Behaviour::Path(points))
                } else {
                    def
                }
            })
            .collect();

        log::debug!("Generated {} hazards with seed {}", count, seed);
        Self::new(arena, particles)
    }
}
