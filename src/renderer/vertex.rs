//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::tuning::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Raw bytes of a vertex slice, ready for upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Scale a color's alpha
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 24);
        let v = [Vertex::new(1.0, 2.0, [0.0, 0.0, 0.0, 1.0])];
        assert_eq!(Vertex::as_bytes(&v).len(), 24);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 0.5], 2.0)[3], 0.5);
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 1.0], -1.0)[3], 0.0);
    }
}
