//! Procedural level generation
//!
//! Layout shape is fixed by the level index (tile count, spacing rules);
//! content is drawn from the seeded RNG so a seed reproduces a level exactly.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::atmosphere::{AtmosphereKind, AtmosphereObject, CloudSize, CraftKind};
use super::collectible::{Crystal, Rarity};
use super::terrain::{Biome, Decoration, DecorationKind, TerrainTile};
use super::{SimRng, seeded_rng};
use crate::consts::*;
use crate::{Rect, Viewport};

/// Vertical band (fraction of viewport height) island tops are drawn from
const TILE_BAND: (f32, f32) = (0.45, 0.75);
/// Horizontal inset for crystals so they hover over solid ground
const CRYSTAL_INSET: f32 = 20.0;
const BALLOON_CHANCE: f64 = 0.3;
const AIRCRAFT_CHANCE: f64 = 0.2;
/// Background dressing rests on this fraction of viewport height
const HORIZON: f32 = 0.92;

/// Everything a level needs except the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub index: u32,
    pub biome: Biome,
    pub tiles: Vec<TerrainTile>,
    pub crystals: Vec<Crystal>,
    pub atmosphere: Vec<AtmosphereObject>,
    pub background: Vec<Decoration>,
}

/// Seeded level generator
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    viewport: Viewport,
    biomes: Vec<Biome>,
    rng: SimRng,
    next_id: u32,
}

impl WorldGenerator {
    pub fn new(seed: u64, viewport: Viewport, biomes: &[Biome]) -> Self {
        let biomes = if biomes.is_empty() {
            log::warn!("Empty biome list, using the default rotation");
            Biome::ALL.to_vec()
        } else {
            biomes.to_vec()
        };
        Self {
            viewport: viewport.sanitized(),
            biomes,
            rng: seeded_rng(seed),
            next_id: 1,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Biome for a 1-based level index, cycling through the rotation
    pub fn biome_for_level(&self, level: u32) -> Biome {
        let level = level.max(1);
        self.biomes[((level - 1) as usize) % self.biomes.len()]
    }

    /// Islands for `level`: `level + 3` of them, ascending x, gaps in [200, 300]
    pub fn generate_tiles(&mut self, level: u32) -> Vec<TerrainTile> {
        let level = level.max(1);
        let biome = self.biome_for_level(level);
        let count = level as usize + 3;
        let width_range = biome.tile_width_range();
        let height_range = biome.tile_height_range();
        let band_top = self.viewport.height * TILE_BAND.0;
        let band_bottom = self.viewport.height * TILE_BAND.1;

        let mut tiles: Vec<TerrainTile> = Vec::with_capacity(count);
        for _ in 0..count {
            let x = match tiles.last() {
                Some(prev) => {
                    prev.bounds.right() + self.rng.random_range(TILE_GAP_MIN..=TILE_GAP_MAX)
                }
                None => FIRST_TILE_X,
            };
            let width = self.rng.random_range(width_range.clone()).max(TILE_MIN_WIDTH);
            let height = self.rng.random_range(height_range.clone());
            let y = self.rng.random_range(band_top..=band_bottom);

            let id = self.next_entity_id();
            let tile = TerrainTile::new(id, Rect::new(x, y, width, height), biome, &mut self.rng);
            tiles.push(tile);
        }

        tiles
    }

    /// Crystals hovering over each island
    pub fn generate_collectibles(&mut self, tiles: &[TerrainTile]) -> Vec<Crystal> {
        let mut crystals = Vec::new();
        for tile in tiles {
            let palette = tile.biome.crystal_palette();
            let count = self.rng.random_range(1..=tile.biome.max_crystals_per_tile());
            let min_x = tile.bounds.x + CRYSTAL_INSET;
            let max_x = (tile.bounds.right() - CRYSTAL_INSET).max(min_x + 1.0);
            let y = tile.bounds.y - CRYSTAL_HOVER;

            for _ in 0..count {
                let x = self.rng.random_range(min_x..max_x);
                let rarity = if self.rng.random_bool(RARE_CHANCE) {
                    Rarity::Rare
                } else {
                    Rarity::Common
                };
                let color = palette
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or([1.0, 1.0, 1.0, 1.0]);
                let id = self.next_entity_id();
                crystals.push(Crystal::new(id, Vec2::new(x, y), rarity, color));
            }
        }
        crystals
    }

    /// Biome parallax layer, clouds across the upper half, and the occasional
    /// balloon or aircraft
    pub fn generate_atmosphere(&mut self, biome: Biome) -> Vec<AtmosphereObject> {
        let Viewport { width, height } = self.viewport;
        let horizon = height * HORIZON;
        let mut objects = Vec::with_capacity(CLOUD_COUNT + 4);

        // Slow layer first so it sits behind the clouds
        let layer: &[AtmosphereKind] = match biome {
            Biome::Jungle => &[AtmosphereKind::Mountain],
            Biome::Aquatic | Biome::Savannah => &[AtmosphereKind::Mountain, AtmosphereKind::Mountain],
            Biome::Farm => &[AtmosphereKind::Building, AtmosphereKind::Fence],
        };
        for &kind in layer {
            let base = match kind {
                AtmosphereKind::Fence => height,
                _ => horizon,
            };
            let pos = Vec2::new(self.rng.random_range(0.0..width), base - kind.size().y);
            objects.push(AtmosphereObject::new(kind, pos, width));
        }

        for _ in 0..CLOUD_COUNT {
            let size = match self.rng.random_range(0..3u32) {
                0 => CloudSize::Small,
                1 => CloudSize::Medium,
                _ => CloudSize::Large,
            };
            let kind = AtmosphereKind::Cloud(size);
            let y_max = (height / 2.0 - kind.size().y).max(1.0);
            let pos = Vec2::new(
                self.rng.random_range(0.0..width),
                self.rng.random_range(0.0..y_max),
            );
            objects.push(AtmosphereObject::new(kind, pos, width));
        }

        if self.rng.random_bool(BALLOON_CHANCE) {
            let pos = Vec2::new(
                self.rng.random_range(0.0..width),
                self.rng.random_range(0.0..(height / 3.0).max(1.0)),
            );
            objects.push(AtmosphereObject::new(AtmosphereKind::Balloon, pos, width));
        }

        if self.rng.random_bool(AIRCRAFT_CHANCE) {
            let craft = if self.rng.random_bool(0.5) {
                CraftKind::Plane
            } else {
                CraftKind::Blimp
            };
            let pos = Vec2::new(width, self.rng.random_range(0.0..(height / 4.0).max(1.0)));
            objects.push(AtmosphereObject::new(AtmosphereKind::Aircraft(craft), pos, width));
        }

        objects
    }

    /// Static distant scenery; no randomness, layout depends only on biome and viewport
    pub fn generate_background(&self, biome: Biome) -> Vec<Decoration> {
        let Viewport { width, height } = self.viewport;
        let horizon = height * HORIZON;
        let mut out = Vec::new();

        match biome {
            Biome::Jungle => {
                scenery_row(&mut out, width, horizon, DecorationKind::Tree, 90.0, Vec2::new(50.0, 90.0), 3, 0.0);
            }
            Biome::Aquatic => {
                scenery_row(&mut out, width, horizon, DecorationKind::Mountain, 260.0, Vec2::new(200.0, 90.0), 2, 40.0);
                scenery_row(&mut out, width, horizon, DecorationKind::Rock, 130.0, Vec2::new(40.0, 20.0), 2, 10.0);
            }
            Biome::Savannah => {
                scenery_row(&mut out, width, horizon, DecorationKind::Mountain, 300.0, Vec2::new(260.0, 140.0), 2, 0.0);
                scenery_row(&mut out, width, horizon, DecorationKind::Tree, 220.0, Vec2::new(70.0, 55.0), 2, 100.0);
            }
            Biome::Farm => {
                scenery_row(&mut out, width, horizon, DecorationKind::Fence, 80.0, Vec2::new(80.0, 24.0), 1, 0.0);
                for (i, frac) in [0.2f32, 0.65].into_iter().enumerate() {
                    out.push(Decoration::standing(
                        DecorationKind::Building,
                        i as u8,
                        width * frac,
                        horizon,
                        Vec2::new(60.0, 70.0),
                    ));
                }
            }
        }

        out
    }

    /// Run all four generation steps for `level`
    pub fn generate_level(&mut self, level: u32) -> Level {
        let index = level.max(1);
        let biome = self.biome_for_level(index);
        let tiles = self.generate_tiles(index);
        let crystals = self.generate_collectibles(&tiles);
        let atmosphere = self.generate_atmosphere(biome);
        let background = self.generate_background(biome);

        log::debug!(
            "Generated level {} ({}): {} tiles, {} crystals ({} rare), {} sky objects",
            index,
            biome.as_str(),
            tiles.len(),
            crystals.len(),
            crystals.iter().filter(|c| c.rarity == Rarity::Rare).count(),
            atmosphere.len()
        );

        Level {
            index,
            biome,
            tiles,
            crystals,
            atmosphere,
            background,
        }
    }
}

/// Evenly spaced row of standing scenery across the viewport width
#[allow(clippy::too_many_arguments)]
fn scenery_row(
    out: &mut Vec<Decoration>,
    width: f32,
    horizon: f32,
    kind: DecorationKind,
    spacing: f32,
    size: Vec2,
    variants: u8,
    offset: f32,
) {
    let mut x = offset;
    let mut i = 0u32;
    while x < width {
        let variant = (i % variants.max(1) as u32) as u8;
        out.push(Decoration::standing(kind, variant, x, horizon, size));
        x += spacing;
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generator(seed: u64) -> WorldGenerator {
        WorldGenerator::new(seed, Viewport::new(800.0, 600.0), &Biome::ALL)
    }

    #[test]
    fn test_biome_cycles_with_level() {
        let generator = WorldGenerator::new(1, Viewport::default(), &[Biome::Farm, Biome::Aquatic]);
        assert_eq!(generator.biome_for_level(1), Biome::Farm);
        assert_eq!(generator.biome_for_level(2), Biome::Aquatic);
        assert_eq!(generator.biome_for_level(3), Biome::Farm);
        // Level 0 is treated as the first level
        assert_eq!(generator.biome_for_level(0), Biome::Farm);
    }

    #[test]
    fn test_empty_biome_list_falls_back() {
        let generator = WorldGenerator::new(1, Viewport::default(), &[]);
        assert_eq!(generator.biome_for_level(2), Biome::Aquatic);
    }

    #[test]
    fn test_tile_count_and_first_tile() {
        let mut generator = generator(5);
        for level in 0..6 {
            let tiles = generator.generate_tiles(level);
            assert_eq!(tiles.len(), level.max(1) as usize + 3);
            assert_eq!(tiles[0].bounds.x, FIRST_TILE_X);
        }
    }

    #[test]
    fn test_tiles_inside_vertical_band() {
        let mut generator = generator(8);
        for tile in generator.generate_tiles(10) {
            assert!(tile.bounds.y >= 600.0 * TILE_BAND.0);
            assert!(tile.bounds.y <= 600.0 * TILE_BAND.1);
            assert!(tile.bounds.width >= TILE_MIN_WIDTH);
        }
    }

    #[test]
    fn test_crystals_hover_over_their_tiles() {
        let mut generator = generator(13);
        let tiles = generator.generate_tiles(4);
        let crystals = generator.generate_collectibles(&tiles);
        assert!(crystals.len() >= tiles.len());
        for crystal in &crystals {
            let owner = tiles
                .iter()
                .find(|t| crystal.pos.x >= t.bounds.x && crystal.pos.x <= t.bounds.right())
                .expect("crystal over a tile");
            assert_eq!(crystal.pos.y, owner.bounds.y - CRYSTAL_HOVER);
            assert!(!crystal.is_collected());
            assert!(owner.biome.crystal_palette().contains(&crystal.color));
        }
    }

    #[test]
    fn test_crystal_count_within_biome_max() {
        let mut generator = generator(17);
        for level in 1..=8 {
            let tiles = generator.generate_tiles(level);
            let max = tiles[0].biome.max_crystals_per_tile() as usize;
            let crystals = generator.generate_collectibles(&tiles);
            assert!(crystals.len() <= tiles.len() * max);
        }
    }

    #[test]
    fn test_rare_fraction_converges() {
        let mut generator = generator(2024);
        let mut total = 0usize;
        let mut rare = 0usize;
        while total < 6000 {
            let tiles = generator.generate_tiles(12);
            for crystal in generator.generate_collectibles(&tiles) {
                total += 1;
                if crystal.rarity == Rarity::Rare {
                    rare += 1;
                }
            }
        }
        let fraction = rare as f64 / total as f64;
        assert!((fraction - 0.2).abs() < 0.03, "rare fraction {fraction}");
    }

    #[test]
    fn test_atmosphere_clouds_in_upper_half() {
        let mut generator = generator(21);
        for _ in 0..20 {
            let objects = generator.generate_atmosphere(Biome::Jungle);
            let clouds: Vec<_> = objects
                .iter()
                .filter(|o| matches!(o.kind, AtmosphereKind::Cloud(_)))
                .collect();
            assert_eq!(clouds.len(), CLOUD_COUNT);
            for cloud in clouds {
                assert!(cloud.bounds.bottom() <= 300.0 + 1e-3);
                assert_eq!(cloud.speed, cloud.kind.speed());
            }
            assert!(objects.len() <= CLOUD_COUNT + 3);
        }
    }

    #[test]
    fn test_atmosphere_layer_follows_biome() {
        let mut generator = generator(30);
        let count = |objects: &[AtmosphereObject], kind: AtmosphereKind| {
            objects.iter().filter(|o| o.kind == kind).count()
        };

        let farm = generator.generate_atmosphere(Biome::Farm);
        assert_eq!(count(&farm, AtmosphereKind::Building), 1);
        assert_eq!(count(&farm, AtmosphereKind::Fence), 1);
        assert_eq!(count(&farm, AtmosphereKind::Mountain), 0);
        let fence = farm
            .iter()
            .find(|o| o.kind == AtmosphereKind::Fence)
            .expect("farm fence");
        assert!((fence.bounds.bottom() - 600.0).abs() < 1e-3);

        let savannah = generator.generate_atmosphere(Biome::Savannah);
        assert_eq!(count(&savannah, AtmosphereKind::Mountain), 2);
        for mountain in savannah.iter().filter(|o| o.kind == AtmosphereKind::Mountain) {
            assert!((mountain.bounds.bottom() - 600.0 * HORIZON).abs() < 1e-3);
            // Distant layer drifts slower than any cloud
            assert!(mountain.speed < AtmosphereKind::Cloud(CloudSize::Large).speed());
        }
    }

    #[test]
    fn test_background_is_deterministic() {
        let a = generator(1);
        let b = generator(999);
        for biome in Biome::ALL {
            let bg_a = a.generate_background(biome);
            let bg_b = b.generate_background(biome);
            assert!(!bg_a.is_empty());
            assert_eq!(bg_a.len(), bg_b.len());
            for (x, y) in bg_a.iter().zip(&bg_b) {
                assert_eq!(x.bounds, y.bounds);
                assert_eq!(x.kind, y.kind);
            }
        }
        let farm = a.generate_background(Biome::Farm);
        assert_eq!(
            farm.iter()
                .filter(|d| d.kind == DecorationKind::Building)
                .count(),
            2
        );
    }

    #[test]
    fn test_same_seed_same_level() {
        let l1 = generator(77).generate_level(3);
        let l2 = generator(77).generate_level(3);
        assert_eq!(l1.biome, Biome::Savannah);
        assert_eq!(l1.tiles.len(), l2.tiles.len());
        for (a, b) in l1.tiles.iter().zip(&l2.tiles) {
            assert_eq!(a.bounds, b.bounds);
        }
        assert_eq!(l1.crystals.len(), l2.crystals.len());
    }

    #[test]
    fn test_ids_unique_across_levels() {
        let mut generator = generator(4);
        let a = generator.generate_level(1);
        let b = generator.generate_level(2);
        let mut ids: Vec<u32> = a
            .tiles
            .iter()
            .map(|t| t.id)
            .chain(a.crystals.iter().map(|c| c.id))
            .chain(b.tiles.iter().map(|t| t.id))
            .chain(b.crystals.iter().map(|c| c.id))
            .collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }

    proptest! {
        #[test]
        fn prop_tile_spacing_invariant(seed in any::<u64>(), level in 1u32..40) {
            let mut generator = generator(seed);
            let tiles = generator.generate_tiles(level);
            prop_assert_eq!(tiles.len(), level as usize + 3);
            for pair in tiles.windows(2) {
                let gap = pair[1].bounds.x - pair[0].bounds.right();
                prop_assert!(gap >= TILE_GAP_MIN - 0.02, "gap {}", gap);
                prop_assert!(gap <= TILE_GAP_MAX + 0.02, "gap {}", gap);
                prop_assert!(!pair[0].bounds.overlaps_x(&pair[1].bounds));
            }
        }
    }
}
