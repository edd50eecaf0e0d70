//! Axis-aligned bounding boxes for the arena and its particles
//!
//! Two coordinate spaces are in play:
//! - world: where the arena currently sits on screen (what the host consumes)
//! - local: relative to the arena's own top-left corner, independent of placement
//!
//! A local box `[0, 0, 20, 20]` maps to `[500, 500, 520, 520]` when the arena is
//! `[500, 500, 1000, 1000]`. Anything handed to the host is in world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle as `(x1, y1)` top-left and `(x2, y2)` bottom-right corners.
///
/// Serialized as a plain `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box with its top-left corner at `origin` spanning `size`
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x1, self.y1)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// This box re-expressed in its own local space: `(0, 0, width, height)`
    pub fn local_extent(&self) -> Self {
        Self::new(0.0, 0.0, self.width(), self.height())
    }

    /// Translate a local box into world space using the arena's origin.
    ///
    /// Only `arena.x1`/`arena.y1` participate; local boxes carry their own size.
    pub fn to_world(&self, arena: &BoundingBox) -> Self {
        self.offset(arena.origin())
    }

    /// Inverse of [`to_world`](Self::to_world)
    pub fn to_local(&self, arena: &BoundingBox) -> Self {
        self.offset(-arena.origin())
    }

    fn offset(&self, by: Vec2) -> Self {
        Self::new(self.x1 + by.x, self.y1 + by.y, self.x2 + by.x, self.y2 + by.y)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}
