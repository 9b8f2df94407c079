//! Shape generation for 2D primitives
//!
//! Outline helpers return points; the tessellators turn points or
//! circles into triangle lists.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::tuning::Rgba;

/// Segment count that keeps a circle of `radius` looking round
pub fn segments_for(radius: f32) -> u32 {
    (radius * 0.8).clamp(12.0, 48.0) as u32
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Triangle fan over a star-shaped outline, anchored at its centroid
pub fn fan(points: &[Vec2], color: Rgba) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;

    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(centroid.x, centroid.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Quad along a segment
pub fn thick_line(from: Vec2, to: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Regular polygon outline, first vertex at `rotation` (0 = pointing right)
pub fn polygon(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let theta = rotation + i as f32 / sides as f32 * TAU;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Heart outline `size` wide, point facing down
pub fn heart(center: Vec2, size: f32) -> Vec<Vec2> {
    const STEPS: u32 = 24;
    let scale = size / 32.0;
    (0..STEPS)
        .map(|i| {
            let t = i as f32 / STEPS as f32 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
            center + Vec2::new(x, y) * scale
        })
        .collect()
}

/// Left half of [`heart`], closed along the vertical center line
pub fn half_heart(center: Vec2, size: f32) -> Vec<Vec2> {
    // t = 0 (top notch) and t = PI (bottom tip) both sit on the center line
    heart(center, size)
        .into_iter()
        .filter(|p| p.x <= center.x + 1e-3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, [1.0; 4], 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 8.0, 10.0, [1.0; 4], 16).len(), 96);
    }

    #[test]
    fn test_polygon_points_on_radius() {
        let pts = polygon(Vec2::new(5.0, 5.0), 10.0, 6, 0.3);
        assert_eq!(pts.len(), 6);
        for p in pts {
            assert!((p.distance(Vec2::new(5.0, 5.0)) - 10.0).abs() < 1e-4);
        }
        assert_eq!(polygon(Vec2::ZERO, 1.0, 1, 0.0).len(), 3);
    }

    #[test]
    fn test_heart_fits_its_box() {
        for p in heart(Vec2::ZERO, 32.0) {
            assert!(p.x.abs() <= 16.0 + 1e-3);
            assert!(p.y.abs() <= 18.0);
        }
        assert!(half_heart(Vec2::ZERO, 32.0).iter().all(|p| p.x <= 1e-3));
    }

    #[test]
    fn test_degenerate_fan_is_empty() {
        assert!(fan(&[Vec2::ZERO, Vec2::X], [1.0; 4]).is_empty());
        assert_eq!(fan(&polygon(Vec2::ZERO, 5.0, 4, 0.0), [1.0; 4]).len(), 12);
    }

    #[test]
    fn test_segments_clamped() {
        assert_eq!(segments_for(1.0), 12);
        assert_eq!(segments_for(1000.0), 48);
    }
}
