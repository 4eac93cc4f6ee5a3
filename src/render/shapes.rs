//! Tessellating render target
//!
//! Turns primitive draw calls into triangle lists. Useful as a GPU upload
//! source and as a deterministic target in tests.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use super::{Color, ImageHandle, RenderTarget};
use crate::Rect;

/// Default segment count for ellipses
pub const ELLIPSE_SEGMENTS: u32 = 16;

/// A recorded image blit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub image: ImageHandle,
    pub dest: Rect,
    pub alpha: f32,
}

/// Render target that accumulates triangles and blits
#[derive(Debug, Clone)]
pub struct MeshTarget {
    pub vertices: Vec<Vertex>,
    pub blits: Vec<Blit>,
    pub ellipse_segments: u32,
}

impl Default for MeshTarget {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            blits: Vec::new(),
            ellipse_segments: ELLIPSE_SEGMENTS,
        }
    }
}

impl MeshTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all geometry, keeping allocations for the next frame
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.blits.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl RenderTarget for MeshTarget {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.vertices.extend(rect_vertices(rect, color));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.vertices
            .extend(ellipse(center, radii, color, self.ellipse_segments));
    }

    fn fill_path(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(polygon_fan(points, color));
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, alpha: f32) {
        self.blits.push(Blit {
            image: *image,
            dest,
            alpha,
        });
    }
}

/// Two triangles covering a rectangle
pub fn rect_vertices(rect: Rect, color: Color) -> [Vertex; 6] {
    let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: Color, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Fan-triangulate a closed polygon (exact for convex shapes)
pub fn polygon_fan(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let origin = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(origin.x, origin.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}
