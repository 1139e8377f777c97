//! Rendering
//!
//! The match is drawn through the [`DrawSurface`] trait in screen pixels.
//! [`VertexBatch`] tessellates those calls into a triangle list that the
//! WebGPU [`RenderState`] presents.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod sprites;
pub mod vertex;

use glam::Vec2;

pub use pipeline::RenderState;
pub use scene::draw_match;
pub use sprites::{SpriteId, SpriteSheet, SpriteVariant};
pub use vertex::{Vertex, colors};

/// Drawing collaborator. Coordinates are screen pixels, y down.
pub trait DrawSurface {
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: [f32; 4]);

    /// Outline of `width` pixels
    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: [f32; 4]);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]);

    /// Player sprite centred on `center`, tinted with the club colour
    fn sprite(&mut self, id: SpriteId, center: Vec2, size: Vec2, tint: [f32; 4]);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.fill_ellipse(center, Vec2::splat(radius), color);
    }
}

/// Skin tone for the head of untextured players
const HEAD: [f32; 4] = [0.95, 0.8, 0.65, 1.0];

/// Collects tessellated geometry for one frame
#[derive(Debug, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl DrawSurface for VertexBatch {
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: [f32; 4]) {
        self.vertices
            .extend(shapes::ellipse(center, radii, color, shapes::DEFAULT_SEGMENTS));
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::ellipse_ring(
            center,
            radii,
            width,
            color,
            shapes::DEFAULT_SEGMENTS * 2,
        ));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        self.vertices.extend(shapes::rect(min, size, color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::line(from, to, width, color));
    }

    /// No texture atlas on this path: a guernsey-coloured body with the head
    /// offset toward the facing direction.
    fn sprite(&mut self, id: SpriteId, center: Vec2, size: Vec2, tint: [f32; 4]) {
        let body = size * 0.5;
        self.vertices.extend(shapes::ellipse(center, body, tint, 16));
        let head = center + id.facing.vector() * body * 0.5;
        self.vertices
            .extend(shapes::circle(head, body.min_element() * 0.45, HEAD, 12));
    }
}
