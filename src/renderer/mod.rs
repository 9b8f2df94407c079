//! Rendering module
//!
//! The draw pass talks to a [`Surface`]: a fixed-size 2D raster target with
//! a transform stack, global alpha and two blend modes. [`VertexSurface`]
//! implements it by tessellating into vertex batches for GPU upload.

pub mod batch;
pub mod draw;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::tuning::Rgba;

pub use batch::{Batch, TextRun, VertexSurface};
pub use draw::draw;
pub use vertex::Vertex;

/// How new pixels combine with the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    /// Glow: colors add up
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// 2D drawing target
///
/// Coordinates are field units. State set through `translate`, `scale`,
/// `set_alpha` and `set_blend` lasts until the matching `restore`.
pub trait Surface {
    /// Width and height in field units
    fn size(&self) -> Vec2;
    /// Wipe the frame and reset all state
    fn clear(&mut self, color: Rgba);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: f32);
    /// Multiplies into every color drawn until `restore`
    fn set_alpha(&mut self, alpha: f32);
    fn set_blend(&mut self, blend: Blend);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    /// Star-shaped outline, filled
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba);
    /// Axis-aligned rect from its top-left corner
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Rgba);

    /// Open polyline
    fn polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }
}
