//! Vertex types for 2D tessellation

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Raw bytes of a vertex slice, ready for upload by a GPU host
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for fallback primitives and palettes
pub mod colors {
    pub const SKY: [f32; 4] = [0.55, 0.8, 0.98, 1.0];
    pub const PLAYER_BODY: [f32; 4] = [0.95, 0.55, 0.2, 1.0];
    pub const PLAYER_WING: [f32; 4] = [1.0, 0.85, 0.5, 1.0];
    pub const PLAYER_CELEBRATE: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
    pub const TRAIL: [f32; 4] = [1.0, 1.0, 1.0, 0.4];
    pub const CELEBRATION: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const RARE_SPARKLE: [f32; 4] = [1.0, 0.95, 0.6, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const MOUNTAIN: [f32; 4] = [0.45, 0.5, 0.6, 1.0];
    pub const BALLOON: [f32; 4] = [0.9, 0.25, 0.3, 1.0];
    pub const BASKET: [f32; 4] = [0.5, 0.35, 0.2, 1.0];
    pub const AIRCRAFT: [f32; 4] = [0.85, 0.85, 0.9, 1.0];
    pub const WOOD: [f32; 4] = [0.55, 0.38, 0.2, 1.0];
    pub const ROCK: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
    pub const LEAF: [f32; 4] = [0.2, 0.6, 0.25, 1.0];
    pub const BUILDING: [f32; 4] = [0.75, 0.3, 0.25, 1.0];
    pub const ROOF: [f32; 4] = [0.35, 0.2, 0.15, 1.0];
}
