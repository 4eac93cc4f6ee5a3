//! Render adapter
//!
//! The simulation draws through [`RenderTarget`], an abstract surface that
//! supports a handful of primitives plus image blits. Art is looked up in an
//! [`AssetMap`] by `"{type}_{subtype}"` key; when a key is missing, each entity
//! falls back to primitive shapes so nothing depends on loaded art.

pub mod shapes;
pub mod vertex;

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

pub use shapes::{Blit, MeshTarget};
pub use vertex::{Vertex, colors};

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Returns `color` with its alpha multiplied by `alpha`
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Host-owned image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle {
    /// Opaque id assigned by the host
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// Images keyed by `"{type}_{subtype}"`
#[derive(Debug, Clone, Default)]
pub struct AssetMap {
    images: HashMap<String, ImageHandle>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, image: ImageHandle) {
        self.images.insert(key.into(), image);
    }

    pub fn get(&self, key: &str) -> Option<&ImageHandle> {
        self.images.get(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Drawing surface supplied by the host
pub trait RenderTarget {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);

    /// Filled closed polygon. Fewer than 3 points draws nothing.
    fn fill_path(&mut self, points: &[Vec2], color: Color);

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, alpha: f32);
}

/// Anything that can put itself on a [`RenderTarget`]
pub trait Drawable {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap);
}

/// Blit the asset for `key` if present, returning whether it was drawn
pub fn blit_asset(
    target: &mut dyn RenderTarget,
    assets: &AssetMap,
    key: &str,
    dest: Rect,
    alpha: f32,
) -> bool {
    match assets.get(key) {
        Some(image) => {
            target.draw_image(image, dest, alpha);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_asset_falls_through_when_missing() {
        let mut target = MeshTarget::new();
        let mut assets = AssetMap::new();
        let dest = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(!blit_asset(&mut target, &assets, "cloud_small", dest, 1.0));
        assert!(target.blits.is_empty());

        assets.insert(
            "cloud_small",
            ImageHandle {
                id: 7,
                width: 64,
                height: 32,
            },
        );
        assert!(blit_asset(&mut target, &assets, "cloud_small", dest, 1.0));
        assert_eq!(target.blits.len(), 1);
        assert_eq!(target.blits[0].image.id, 7);
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = with_alpha([1.0, 0.5, 0.25, 0.8], 2.0);
        assert_eq!(c[3], 0.8);
        let c = with_alpha([1.0, 0.5, 0.25, 0.8], 0.5);
        assert!((c[3] - 0.4).abs() < 1e-6);
    }
}
