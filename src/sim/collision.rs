//! Overlap tests
//!
//! Everything in the field collides as circles except obstacles, which are
//! axis-aligned rectangles hit-tested by a single point.

use glam::Vec2;

/// True if two circles overlap (strictly: touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// True if `point` lies strictly inside the rectangle at `min` with `size`
#[inline]
pub fn point_in_rect(point: Vec2, min: Vec2, size: Vec2) -> bool {
    point.x > min.x && point.x < min.x + size.x && point.y > min.y && point.y < min.y + size.y
}

/// True if `point` is within `radius` of `center`
#[inline]
pub fn within(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap_uses_summed_radii() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(circles_overlap(a, 6.0, b, 5.0));
        assert!(!circles_overlap(a, 5.0, b, 5.0));
        assert!(!circles_overlap(a, 4.0, b, 5.0));
    }

    #[test]
    fn test_point_in_rect_edges_exclusive() {
        let min = Vec2::new(10.0, 10.0);
        let size = Vec2::new(90.0, 45.0);
        assert!(point_in_rect(Vec2::new(50.0, 30.0), min, size));
        assert!(!point_in_rect(Vec2::new(10.0, 30.0), min, size));
        assert!(!point_in_rect(Vec2::new(50.0, 55.0), min, size));
    }

    #[test]
    fn test_within_radius() {
        assert!(within(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.1));
        assert!(!within(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
    }
}
