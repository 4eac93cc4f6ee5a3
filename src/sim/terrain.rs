//! Floating islands and their decorations
//!
//! Islands are the only solid geometry. Decorations are purely cosmetic and
//! live and die with the island (or level background) that owns them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use crate::Rect;
use crate::render::{AssetMap, Color, Drawable, RenderTarget, blit_asset, colors};

/// Thematic terrain grouping, selects ranges and palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Jungle,
    Aquatic,
    Savannah,
    Farm,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Jungle, Biome::Aquatic, Biome::Savannah, Biome::Farm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Jungle => "jungle",
            Biome::Aquatic => "aquatic",
            Biome::Savannah => "savannah",
            Biome::Farm => "farm",
        }
    }

    /// Island width range (min is never below `TILE_MIN_WIDTH`)
    pub fn tile_width_range(&self) -> std::ops::Range<f32> {
        match self {
            Biome::Jungle => 160.0..240.0,
            Biome::Aquatic => 140.0..220.0,
            Biome::Savannah => 180.0..280.0,
            Biome::Farm => 200.0..300.0,
        }
    }

    pub fn tile_height_range(&self) -> std::ops::Range<f32> {
        match self {
            Biome::Jungle => 50.0..70.0,
            Biome::Aquatic => 40.0..60.0,
            Biome::Savannah => 45.0..65.0,
            Biome::Farm => 50.0..70.0,
        }
    }

    /// Upper bound on crystals hovering over a single island
    pub fn max_crystals_per_tile(&self) -> u32 {
        match self {
            Biome::Jungle => 3,
            Biome::Aquatic => 4,
            Biome::Savannah => 2,
            Biome::Farm => 3,
        }
    }

    /// Ground colors: top surface, underside, footstep dust
    pub fn ground_palette(&self) -> [Color; 3] {
        match self {
            Biome::Jungle => [
                [0.25, 0.65, 0.25, 1.0],
                [0.4, 0.28, 0.15, 1.0],
                [0.35, 0.75, 0.3, 1.0],
            ],
            Biome::Aquatic => [
                [0.95, 0.88, 0.65, 1.0],
                [0.2, 0.45, 0.65, 1.0],
                [0.6, 0.85, 1.0, 1.0],
            ],
            Biome::Savannah => [
                [0.85, 0.75, 0.35, 1.0],
                [0.6, 0.4, 0.2, 1.0],
                [0.9, 0.8, 0.5, 1.0],
            ],
            Biome::Farm => [
                [0.45, 0.75, 0.3, 1.0],
                [0.5, 0.33, 0.18, 1.0],
                [0.65, 0.5, 0.3, 1.0],
            ],
        }
    }

    /// Crystal colors for this biome
    pub fn crystal_palette(&self) -> &'static [Color] {
        match self {
            Biome::Jungle => &[[0.3, 1.0, 0.5, 1.0], [0.6, 1.0, 0.3, 1.0], [0.2, 0.9, 0.8, 1.0]],
            Biome::Aquatic => &[[0.3, 0.7, 1.0, 1.0], [0.5, 0.9, 1.0, 1.0], [0.7, 0.5, 1.0, 1.0]],
            Biome::Savannah => &[[1.0, 0.7, 0.2, 1.0], [1.0, 0.5, 0.3, 1.0], [1.0, 0.85, 0.4, 1.0]],
            Biome::Farm => &[[1.0, 0.4, 0.6, 1.0], [0.9, 0.3, 0.9, 1.0], [1.0, 0.6, 0.4, 1.0]],
        }
    }
}

/// What a decoration depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationKind {
    Tree,
    Bush,
    Rock,
    Coral,
    Seaweed,
    Grass,
    Crop,
    Fence,
    Mountain,
    Building,
}

impl DecorationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Tree => "tree",
            DecorationKind::Bush => "bush",
            DecorationKind::Rock => "rock",
            DecorationKind::Coral => "coral",
            DecorationKind::Seaweed => "seaweed",
            DecorationKind::Grass => "grass",
            DecorationKind::Crop => "crop",
            DecorationKind::Fence => "fence",
            DecorationKind::Mountain => "mountain",
            DecorationKind::Building => "building",
        }
    }
}

/// Static cosmetic element (no physics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub variant: u8,
    pub bounds: Rect,
}

impl Decoration {
    pub fn new(kind: DecorationKind, variant: u8, bounds: Rect) -> Self {
        Self {
            kind,
            variant,
            bounds,
        }
    }

    /// Standing on a surface: `base_y` is where its bottom edge rests
    pub fn standing(kind: DecorationKind, variant: u8, x: f32, base_y: f32, size: Vec2) -> Self {
        Self::new(kind, variant, Rect::new(x, base_y - size.y, size.x, size.y))
    }

    pub fn asset_key(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.variant)
    }

    /// Draw shifted by `offset` (used for parallax background layers)
    pub fn draw_offset(&self, target: &mut dyn RenderTarget, assets: &AssetMap, offset: Vec2) {
        let b = self.bounds.translated(offset);
        if blit_asset(target, assets, &self.asset_key(), b, 1.0) {
            return;
        }

        let center = b.center();
        match self.kind {
            DecorationKind::Tree => {
                let trunk_w = b.width * 0.2;
                target.fill_rect(
                    Rect::new(center.x - trunk_w / 2.0, b.y + b.height * 0.5, trunk_w, b.height * 0.5),
                    colors::WOOD,
                );
                target.fill_ellipse(
                    Vec2::new(center.x, b.y + b.height * 0.3),
                    Vec2::new(b.width / 2.0, b.height * 0.3),
                    colors::LEAF,
                );
            }
            DecorationKind::Bush | DecorationKind::Grass | DecorationKind::Crop => {
                let color = match self.kind {
                    DecorationKind::Crop => [0.85, 0.7, 0.2, 1.0],
                    DecorationKind::Grass => [0.5, 0.75, 0.3, 1.0],
                    _ => colors::LEAF,
                };
                target.fill_ellipse(center, Vec2::new(b.width / 2.0, b.height / 2.0), color);
            }
            DecorationKind::Rock => {
                target.fill_ellipse(center, Vec2::new(b.width / 2.0, b.height / 2.0), colors::ROCK);
            }
            DecorationKind::Coral | DecorationKind::Seaweed => {
                let color = if self.kind == DecorationKind::Coral {
                    [1.0, 0.5, 0.55, 1.0]
                } else {
                    [0.2, 0.55, 0.35, 1.0]
                };
                target.fill_path(
                    &[
                        Vec2::new(b.x, b.bottom()),
                        Vec2::new(center.x, b.y),
                        Vec2::new(b.right(), b.bottom()),
                    ],
                    color,
                );
            }
            DecorationKind::Fence => {
                let rail_h = (b.height * 0.15).max(1.0);
                target.fill_rect(Rect::new(b.x, b.y + b.height * 0.3, b.width, rail_h), colors::WOOD);
                target.fill_rect(Rect::new(b.x, b.y + b.height * 0.65, b.width, rail_h), colors::WOOD);
                let posts = ((b.width / 20.0) as usize).max(2);
                for i in 0..posts {
                    let px = b.x + i as f32 * (b.width - 4.0) / (posts - 1) as f32;
                    target.fill_rect(Rect::new(px, b.y, 4.0, b.height), colors::WOOD);
                }
            }
            DecorationKind::Mountain => {
                target.fill_path(
                    &[
                        Vec2::new(b.x, b.bottom()),
                        Vec2::new(center.x, b.y),
                        Vec2::new(b.right(), b.bottom()),
                    ],
                    colors::MOUNTAIN,
                );
            }
            DecorationKind::Building => {
                let wall = Rect::new(b.x, b.y + b.height * 0.35, b.width, b.height * 0.65);
                target.fill_rect(wall, colors::BUILDING);
                target.fill_path(
                    &[
                        Vec2::new(b.x, wall.y),
                        Vec2::new(center.x, b.y),
                        Vec2::new(b.right(), wall.y),
                    ],
                    colors::ROOF,
                );
            }
        }
    }
}

impl Drawable for Decoration {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        self.draw_offset(target, assets, Vec2::ZERO);
    }
}

/// A floating island the player can land on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainTile {
    pub id: u32,
    pub bounds: Rect,
    pub biome: Biome,
    pub variant: u8,
    pub decorations: Vec<Decoration>,
}

impl TerrainTile {
    /// Build an island and dress it using the biome's rules
    pub fn new(id: u32, bounds: Rect, biome: Biome, rng: &mut SimRng) -> Self {
        let variant = rng.random_range(0..3u8);
        let decorations = decorate(&bounds, biome, rng);
        Self {
            id,
            bounds,
            biome,
            variant,
            decorations,
        }
    }

    pub fn asset_key(&self) -> String {
        format!("island_{}", self.biome.as_str())
    }

    /// Dust color kicked up when landing
    pub fn footstep_color(&self) -> Color {
        self.biome.ground_palette()[2]
    }
}

impl Drawable for TerrainTile {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        let b = self.bounds;
        if !blit_asset(target, assets, &self.asset_key(), b, 1.0) {
            let [top, under, _] = self.biome.ground_palette();
            let top_h = b.height * 0.3;
            // Rocky underside tapering to a point
            target.fill_path(
                &[
                    Vec2::new(b.x, b.y + top_h),
                    Vec2::new(b.right(), b.y + top_h),
                    Vec2::new(b.x + b.width * (0.55 + 0.1 * self.variant as f32), b.bottom()),
                    Vec2::new(b.x + b.width * 0.3, b.bottom() - b.height * 0.2),
                ],
                under,
            );
            target.fill_rect(Rect::new(b.x, b.y, b.width, top_h), top);
        }

        for decoration in &self.decorations {
            decoration.draw(target, assets);
        }
    }
}

/// Drop a standing decoration at a random x inside the island's span
fn place(
    decorations: &mut Vec<Decoration>,
    bounds: &Rect,
    rng: &mut SimRng,
    kind: DecorationKind,
    size: Vec2,
    variants: u8,
) {
    let max_x = bounds.right() - size.x;
    let x = if max_x > bounds.x {
        rng.random_range(bounds.x..max_x)
    } else {
        bounds.x
    };
    let variant = rng.random_range(0..variants);
    decorations.push(Decoration::standing(kind, variant, x, bounds.y, size));
}

/// Per-biome island dressing
fn decorate(bounds: &Rect, biome: Biome, rng: &mut SimRng) -> Vec<Decoration> {
    let mut out = Vec::new();
    let top = bounds.y;

    match biome {
        Biome::Jungle => {
            for _ in 0..rng.random_range(1..=2u32) {
                place(&mut out, bounds, rng, DecorationKind::Tree, Vec2::new(40.0, 70.0), 3);
            }
            for _ in 0..rng.random_range(0..=2u32) {
                place(&mut out, bounds, rng, DecorationKind::Bush, Vec2::new(28.0, 18.0), 2);
            }
        }
        Biome::Aquatic => {
            for _ in 0..rng.random_range(1..=3u32) {
                place(&mut out, bounds, rng, DecorationKind::Coral, Vec2::new(20.0, 28.0), 3);
            }
            if rng.random_bool(0.5) {
                place(&mut out, bounds, rng, DecorationKind::Seaweed, Vec2::new(12.0, 34.0), 2);
            }
            if rng.random_bool(0.3) {
                place(&mut out, bounds, rng, DecorationKind::Rock, Vec2::new(22.0, 14.0), 2);
            }
        }
        Biome::Savannah => {
            if rng.random_bool(0.6) {
                place(&mut out, bounds, rng, DecorationKind::Tree, Vec2::new(60.0, 50.0), 2);
            }
            for _ in 0..rng.random_range(1..=3u32) {
                place(&mut out, bounds, rng, DecorationKind::Grass, Vec2::new(16.0, 12.0), 2);
            }
            if rng.random_bool(0.4) {
                place(&mut out, bounds, rng, DecorationKind::Rock, Vec2::new(24.0, 16.0), 2);
            }
        }
        Biome::Farm => {
            // A row of crops across the middle of the field
            let count = ((bounds.width - 40.0) / 24.0).max(1.0) as usize;
            let variant = rng.random_range(0..3u8);
            for i in 0..count.min(8) {
                let x = bounds.x + 20.0 + i as f32 * 24.0;
                out.push(Decoration::standing(
                    DecorationKind::Crop,
                    variant,
                    x,
                    top,
                    Vec2::new(16.0, 20.0),
                ));
            }
            if rng.random_bool(0.5) {
                out.push(Decoration::standing(
                    DecorationKind::Fence,
                    0,
                    bounds.x + 4.0,
                    top,
                    Vec2::new((bounds.width * 0.4).min(80.0), 22.0),
                ));
            }
        }
    }

    out
}
