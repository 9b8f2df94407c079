//! Vertex-batching surface
//!
//! Every draw call is tessellated on the CPU into triangle lists. Consecutive
//! calls with the same blend mode share a batch, so a frame uploads as a
//! handful of buffers. Text is not rasterized here; it is collected as runs
//! for the presentation layer's font renderer.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, with_alpha};
use super::{Blend, Surface, TextAlign};
use crate::tuning::{Rgba, palette};

/// Triangles sharing one blend mode
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub blend: Blend,
    pub vertices: Vec<Vertex>,
}

/// A string to draw, already in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub align: TextAlign,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    offset: Vec2,
    scale: f32,
    alpha: f32,
    blend: Blend,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            alpha: 1.0,
            blend: Blend::Normal,
        }
    }
}

impl DrawState {
    fn apply(&self, p: Vec2) -> Vec2 {
        self.offset + p * self.scale
    }
}

#[derive(Debug, Clone)]
pub struct VertexSurface {
    size: Vec2,
    clear_color: Rgba,
    batches: Vec<Batch>,
    text: Vec<TextRun>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl VertexSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            clear_color: palette::BACKGROUND,
            batches: Vec::new(),
            text: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Transform, fade and append freshly tessellated vertices
    fn emit(&mut self, mut vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        let state = self.state;
        for v in &mut vertices {
            let p = state.apply(Vec2::from(v.position));
            v.position = p.to_array();
            v.color = with_alpha(v.color, state.alpha);
        }

        match self.batches.last_mut() {
            Some(batch) if batch.blend == state.blend => batch.vertices.extend(vertices),
            _ => self.batches.push(Batch {
                blend: state.blend,
                vertices,
            }),
        }
    }
}

impl Surface for VertexSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.batches.clear();
        self.text.clear();
        self.state = DrawState::default();
        self.stack.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.offset += offset * self.state.scale;
    }

    fn scale(&mut self, factor: f32) {
        self.state.scale *= factor;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_blend(&mut self, blend: Blend) {
        self.state.blend = blend;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        self.emit(shapes::circle(center, radius, color, shapes::segments_for(radius)));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        let half = width * 0.5;
        let inner = (radius - half).max(0.0);
        self.emit(shapes::ring(
            center,
            inner,
            radius + half,
            color,
            shapes::segments_for(radius),
        ));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.emit(shapes::fan(points, color));
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        let n = points.len();
        if n < 2 {
            return;
        }
        let mut vertices = Vec::with_capacity(n * 6);
        for i in 0..n {
            vertices.extend(shapes::thick_line(points[i], points[(i + 1) % n], width, color));
        }
        self.emit(vertices);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let corners = [
            origin,
            origin + Vec2::new(size.x, 0.0),
            origin + size,
            origin + Vec2::new(0.0, size.y),
        ];
        self.emit(vec![
            Vertex::new(corners[0].x, corners[0].y, color),
            Vertex::new(corners[1].x, corners[1].y, color),
            Vertex::new(corners[2].x, corners[2].y, color),
            Vertex::new(corners[0].x, corners[0].y, color),
            Vertex::new(corners[2].x, corners[2].y, color),
            Vertex::new(corners[3].x, corners[3].y, color),
        ]);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.emit(shapes::thick_line(from, to, width, color));
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Rgba) {
        self.text.push(TextRun {
            text: text.to_string(),
            pos: self.state.apply(pos),
            size: size * self.state.scale,
            align,
            color: with_alpha(color, self.state.alpha),
        });
    }
}
