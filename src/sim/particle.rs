//! Particle definitions and per-frame update records

use glam::Vec2;
use serde::{Deserialize, Serialize, Serializer};

use super::bounds::BoundingBox;

/// How a particle is meant to travel.
///
/// Only declared here: the motion step treats every variant the same way.
/// `Path` holds a flat point sequence reserved for path-following motion.
/// On the wire this is either the literal `"bounce"` or a number array.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawBehaviour")]
pub enum Behaviour {
    #[default]
    Bounce,
    Path(Vec<f32>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBehaviour {
    Tag(String),
    Path(Vec<f32>),
}

impl TryFrom<RawBehaviour> for Behaviour {
    type Error = String;

    fn try_from(raw: RawBehaviour) -> Result<Self, Self::Error> {
        match raw {
            RawBehaviour::Tag(tag) if tag == "bounce" => Ok(Behaviour::Bounce),
            RawBehaviour::Tag(tag) => Err(format!("unknown behaviour `{tag}`")),
            RawBehaviour::Path(points) => Ok(Behaviour::Path(points)),
        }
    }
}

impl Serialize for Behaviour {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Behaviour::Bounce => s.serialize_str("bounce"),
            Behaviour::Path(points) => points.serialize(s),
        }
    }
}

/// A hazard as supplied by the host. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDef {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub behaviour: Behaviour,
    /// Starting top-left corner in arena-local coordinates
    pub start: [f32; 2],
    pub damage: f32,
    /// Per-frame displacement along both axes (may be negative)
    pub speed: f32,
    /// Rendering hint only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

impl ParticleDef {
    pub fn new(width: f32, height: f32, start: [f32; 2], speed: f32, damage: f32) -> Self {
        Self {
            width,
            height,
            behaviour: Behaviour::Bounce,
            start,
            damage,
            speed,
            sprite: None,
        }
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Local box at the starting position
    pub fn initial_bounds(&self) -> BoundingBox {
        BoundingBox::from_origin_size(Vec2::from(self.start), self.size())
    }
}

/// One particle's hit-box and damage for the current frame (world space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleUpdate {
    pub bounding_box: BoundingBox,
    pub damage: f32,
}

/// Local boxes for a fresh run, index-aligned with `particles`
pub fn initial_positions(particles: &[ParticleDef]) -> Vec<BoundingBox> {
    particles.iter().map(ParticleDef::initial_bounds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_positions() {
        let defs = vec![
            ParticleDef::new(10.0, 20.0, [5.0, 6.0], 1.0, 3.0),
            ParticleDef::new(4.0, 4.0, [0.0, 0.0], 0.0, 0.0),
        ];
        let positions = initial_positions(&defs);
        assert_eq!(positions[0], BoundingBox::new(5.0, 6.0, 15.0, 26.0));
        assert_eq!(positions[1], BoundingBox::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_parse_bounce_behaviour() {
        let json = r#"{"width":10,"height":10,"behaviour":"bounce","start":[0,0],"damage":5,"speed":10}"#;
        let def: ParticleDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.behaviour, Behaviour::Bounce);
        assert_eq!(def.sprite, None);
    }

    #[test]
    fn test_parse_path_behaviour() {
        let json = r#"{"width":8,"height":8,"behaviour":[1,2,3.5],"start":[0,0],"damage":1,"speed":-2,"sprite":"skull"}"#;
        let def: ParticleDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.behaviour, Behaviour::Path(vec![1.0, 2.0, 3.5]));
        assert_eq!(def.sprite.as_deref(), Some("skull"));
    }

    #[test]
    fn test_unknown_behaviour_tag_rejected() {
        let json = r#"{"width":8,"height":8,"behaviour":"spiral","start":[0,0],"damage":1,"speed":1}"#;
        assert!(serde_json::from_str::<ParticleDef>(json).is_err());
    }

    #[test]
    fn test_behaviour_serializes_as_literal() {
        assert_eq!(serde_json::to_string(&Behaviour::Bounce).unwrap(), "\"bounce\"");
        assert_eq!(serde_json::to_string(&Behaviour::Path(vec![1.0])).unwrap(), "[1.0]");
    }

    #[test]
    fn test_update_wire_format() {
        let update = ParticleUpdate {
            bounding_box: BoundingBox::new(10.0, 10.0, 20.0, 20.0),
            damage: 5.0,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"boundingBox":[10.0,10.0,20.0,20.0],"damage":5.0}"#);
    }
}
