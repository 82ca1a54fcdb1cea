//! Overlap tests used by the interaction resolver
//!
//! Everything in this game is axis-aligned: player and obstacles are boxes,
//! logs are horizontal spans. Small pure predicates, no response math.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Standard AABB intersection: no overlap if any axis is fully separated
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Whether `x` falls within the horizontal span centered at `center_x`
#[inline]
pub fn span_contains(center_x: f32, width: f32, x: f32) -> bool {
    (x - center_x).abs() <= width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_hit() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(8.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::from_center_size(Vec2::new(0.0, 20.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_span_contains() {
        assert!(span_contains(100.0, 50.0, 80.0));
        assert!(span_contains(100.0, 50.0, 125.0));
        assert!(!span_contains(100.0, 50.0, 126.0));
    }
}
