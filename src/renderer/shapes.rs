//! Shape generation for 2D primitives

use super::vertex::Vertex;
use crate::sim::BoundingBox;
use crate::surface::Rgba;

/// Generate vertices for a filled axis-aligned rectangle (two triangles)
pub fn rect(bounds: &BoundingBox, color: Rgba) -> [Vertex; 6] {
    let BoundingBox { x1, y1, x2, y2 } = *bounds;
    [
        Vertex::new(x1, y1, color),
        Vertex::new(x2, y1, color),
        Vertex::new(x1, y2, color),
        Vertex::new(x1, y2, color),
        Vertex::new(x2, y1, color),
        Vertex::new(x2, y2, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(&BoundingBox::new(1.0, 2.0, 3.0, 4.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 3.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 4.0);
    }
}
