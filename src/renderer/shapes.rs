//! Shape generation for 2D primitives
//!
//! Tessellates a draw list into a triangle list in clip space, for hosts that
//! upload vertices to a GPU instead of painting a canvas. Text is left to the
//! host.

use glam::Vec2;

use super::Color;
use super::draw::{DrawList, Surface};
use super::vertex::Vertex;

/// Surface that accumulates triangles
#[derive(Debug, Clone)]
pub struct VertexSurface {
    canvas: Vec2,
    vertices: Vec<Vertex>,
}

impl VertexSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            canvas: Vec2::new(width, height),
            vertices: Vec::new(),
        }
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Canvas pixels to clip space (y up)
    fn to_clip(&self, p: Vec2) -> [f32; 2] {
        [
            p.x / self.canvas.x * 2.0 - 1.0,
            1.0 - p.y / self.canvas.y * 2.0,
        ]
    }

    fn push(&mut self, p: Vec2, color: [f32; 4]) {
        let [x, y] = self.to_clip(p);
        self.vertices.push(Vertex::new(x, y, color));
    }

    /// Two triangles covering the quad `a b c d` (in winding order)
    fn quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
        self.push(a, color);
        self.push(b, color);
        self.push(c, color);

        self.push(c, color);
        self.push(d, color);
        self.push(a, color);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.quad(
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
            color,
        );
    }

    fn segment(&mut self, p1: Vec2, p2: Vec2, width: f32, color: [f32; 4]) {
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
        self.quad(p1 + perp, p2 + perp, p2 - perp, p1 - perp, color);
    }
}

impl Surface for VertexSurface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        // A full-canvas clear starts a new frame; partial clears have no
        // meaning in an additive triangle list
        if x <= 0.0 && y <= 0.0 && w >= self.canvas.x && h >= self.canvas.y {
            self.vertices.clear();
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.rect(x, y, w, h, color.to_f32());
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        let c = color.to_f32();
        let half = width * 0.5;
        // Top, bottom, left, right bands centred on the outline
        self.rect(x - half, y - half, w + width, width, c);
        self.rect(x - half, y + h - half, w + width, width, c);
        self.rect(x - half, y + half, width, h - width, c);
        self.rect(x + w - half, y + half, width, h - width, c);
    }

    fn line(&mut self, points: &[[f32; 2]], color: Color, width: f32) {
        let c = color.to_f32();
        for pair in points.windows(2) {
            self.segment(Vec2::from(pair[0]), Vec2::from(pair[1]), width, c);
        }
    }

    fn text(&mut self, _text: &str, _x: f32, _y: f32, _font: &str, _color: Color) {}
}

/// Triangle list for a whole draw list
pub fn tessellate(list: &DrawList, width: f32, height: f32) -> Vec<Vertex> {
    let mut surface = VertexSurface::new(width, height);
    list.replay(Some(&mut surface));
    surface.into_vertices()
}

/// Raw bytes for a vertex buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
