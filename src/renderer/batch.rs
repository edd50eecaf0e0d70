//! CPU-side drawing surface that records filled rectangles
//!
//! Used headless (native demo, tests) and as the staging buffer for the
//! WebGPU renderer.

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::BoundingBox;
use crate::surface::{DrawSurface, Rgba};

/// A filled rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub bounds: BoundingBox,
    pub color: Rgba,
}

/// Records `fill_rect` calls as quads
#[derive(Debug, Clone)]
pub struct QuadBatch {
    size: (u32, u32),
    fill: Rgba,
    quads: Vec<Quad>,
}

impl QuadBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            fill: colors::PARTICLE,
            quads: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Triangle list for every recorded quad, in draw order
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(self.quads.len() * 6);
        for quad in &self.quads {
            vertices.extend_from_slice(&shapes::rect(&quad.bounds, quad.color));
        }
        vertices
    }
}

impl DrawSurface for QuadBatch {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Drops every quad lying entirely inside the cleared area
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x2, y2) = (x + width, y + height);
        self.quads.retain(|q| {
            let b = &q.bounds;
            !(b.x1 >= x && b.y1 >= y && b.x2 <= x2 && b.y2 <= y2)
        });
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.quads.push(Quad {
            bounds: BoundingBox::new(x, y, x + width, y + height),
            color: self.fill,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_records_current_color() {
        const HAZARD: Rgba = [1.0, 0.3, 0.25, 1.0];
        let mut batch = QuadBatch::new(100, 100);
        batch.set_fill_color(HAZARD);
        batch.fill_rect(10.0, 10.0, 5.0, 5.0);
        assert_eq!(batch.quads().len(), 1);
        assert_eq!(batch.quads()[0].color, HAZARD);
        assert_eq!(batch.quads()[0].bounds, BoundingBox::new(10.0, 10.0, 15.0, 15.0));
        assert_eq!(batch.vertices().len(), 6);
    }

    #[test]
    fn test_clear_whole_surface() {
        let mut batch = QuadBatch::new(100, 100);
        batch.fill_rect(0.0, 0.0, 10.0, 10.0);
        batch.fill_rect(90.0, 90.0, 10.0, 10.0);
        batch.clear();
        assert!(batch.quads().is_empty());
    }

    #[test]
    fn test_partial_clear_keeps_outside_quads() {
        let mut batch = QuadBatch::new(100, 100);
        batch.fill_rect(0.0, 0.0, 10.0, 10.0);
        batch.fill_rect(60.0, 60.0, 10.0, 10.0);
        batch.clear_rect(0.0, 0.0, 50.0, 50.0);
        assert_eq!(batch.quads().len(), 1);
        assert_eq!(batch.quads()[0].bounds.x1, 60.0);
    }
}
