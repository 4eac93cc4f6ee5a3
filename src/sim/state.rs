//! World state and the per-tick orchestration
//!
//! `World` owns every per-level collection plus the player. The host drives it
//! once per frame through `advance_scroll`, `tick_entities` and
//! `resolve_collisions` (or the `tick` helper that runs all three in order).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::atmosphere::AtmosphereObject;
use super::collectible::{Crystal, Rarity};
use super::collision::{landing_contact, pickup_hit};
use super::player::Player;
use super::terrain::{Biome, Decoration, TerrainTile};
use super::worldgen::{Level, WorldGenerator};
use super::{Entity, SimRng, seeded_rng};
use crate::render::{AssetMap, Drawable, RenderTarget, blit_asset, colors};
use crate::settings::Settings;
use crate::{Rect, Viewport, ticks_for};

/// Chance of kicking up dust on a supported tick
const FOOTSTEP_CHANCE: f64 = 0.65;
/// Background layer scrolls at this fraction of the world scroll
const BACKGROUND_PARALLAX: f32 = 0.1;

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: u32, biome: Biome },
    /// Player touched down after being airborne
    Landed { tile_id: u32 },
    CrystalCollected { id: u32, rarity: Rarity },
    /// Player dropped below the fall limit (sent once per level)
    FellOutOfWorld,
}

/// Complete simulation state for a run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    viewport: Viewport,
    generator: WorldGenerator,
    /// Effect RNG (particles, footsteps), separate from generation
    rng: SimRng,
    level: u32,
    biome: Biome,
    /// Accumulated world scroll
    pub scroll_offset: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub tiles: Vec<TerrainTile>,
    pub crystals: Vec<Crystal>,
    pub atmosphere: Vec<AtmosphereObject>,
    pub background: Vec<Decoration>,
    events: Vec<GameEvent>,
    /// Grounded state at the end of the previous collision pass
    was_grounded: bool,
    fell_out: bool,
}

impl World {
    /// Create a world and load level 1
    pub fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        let viewport = viewport.sanitized();
        let generator = WorldGenerator::new(seed, viewport, &settings.biomes);
        let mut player = Player::new();
        player.max_trail = settings.max_trail_particles();

        let mut world = Self {
            seed,
            settings,
            viewport,
            biome: generator.biome_for_level(1),
            generator,
            // Decorrelate effects from generation
            rng: seeded_rng(seed ^ 0x9e37_79b9_7f4a_7c15),
            level: 1,
            scroll_offset: 0.0,
            time_ticks: 0,
            player,
            tiles: Vec::new(),
            crystals: Vec::new(),
            atmosphere: Vec::new(),
            background: Vec::new(),
            events: Vec::new(),
            was_grounded: false,
            fell_out: false,
        };
        world.load_level(1);
        world
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the play area; applies to the fall limit now and to generation
    /// from the next loaded level on
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
        self.generator.set_viewport(self.viewport);
    }

    /// Generate `level` and swap it in; the player is reset, not recreated
    pub fn load_level(&mut self, level: u32) {
        let generated = self.generator.generate_level(level);
        self.install_level(generated);
    }

    /// Swap in an already generated level
    pub fn install_level(&mut self, level: Level) {
        self.level = level.index;
        self.biome = level.biome;
        self.tiles = level.tiles;
        self.crystals = level.crystals;
        self.atmosphere = level.atmosphere;
        self.background = level.background;
        self.scroll_offset = 0.0;
        self.was_grounded = false;
        self.fell_out = false;
        self.player.reset();

        log::info!(
            "Level {} loaded ({}, {} islands, {} crystals)",
            self.level,
            self.biome.as_str(),
            self.tiles.len(),
            self.crystals.len()
        );
        self.events.push(GameEvent::LevelLoaded {
            level: self.level,
            biome: self.biome,
        });
    }

    /// Advance the world scroll by one frame
    pub fn advance_scroll(&mut self, dt: f32) {
        self.scroll_offset += self.settings.scroll_speed * ticks_for(dt);
    }

    /// Self-update of the player, crystals and sky objects
    ///
    /// A frame with no elapsed time (zero, negative or non-finite `dt`) is not
    /// a tick: nothing moves or decays and `time_ticks` stays put.
    pub fn tick_entities(&mut self, dt: f32) {
        if ticks_for(dt) <= 0.0 {
            return;
        }
        self.time_ticks += 1;
        self.player.update(dt, &mut self.rng);

        let emit = self.settings.particles;
        for crystal in &mut self.crystals {
            crystal.update_with(dt, &mut self.rng, emit);
        }
        for object in &mut self.atmosphere {
            object.update(dt, &mut self.rng);
        }
    }

    /// Land the player on islands and pick up touched crystals
    ///
    /// `on_collect` fires exactly once per crystal, on its transition to
    /// collected. Calling this again with unchanged positions is a no-op for
    /// crystals already taken.
    pub fn resolve_collisions<F>(&mut self, mut on_collect: F)
    where
        F: FnMut(&Crystal),
    {
        // Islands
        for tile in &self.tiles {
            let Some(snapped_y) =
                landing_contact(&self.player.bounds(), self.player.velocity_y, &tile.bounds)
            else {
                continue;
            };

            self.player.land(snapped_y);
            if self.rng.random_bool(FOOTSTEP_CHANCE) {
                self.player.emit_footsteps(&mut self.rng, tile.footstep_color());
            }
            if !self.was_grounded {
                self.events.push(GameEvent::Landed { tile_id: tile.id });
            }
            break;
        }
        self.was_grounded = self.player.is_grounded;

        // Crystals
        let body = self.player.bounds();
        let emit = self.settings.particles;
        for crystal in &mut self.crystals {
            if crystal.is_collected() || !pickup_hit(&body, crystal.pos) {
                continue;
            }
            if crystal.collect(&mut self.rng, emit) {
                log::debug!("Collected crystal {} ({})", crystal.id, crystal.rarity.as_str());
                self.events.push(GameEvent::CrystalCollected {
                    id: crystal.id,
                    rarity: crystal.rarity,
                });
                on_collect(&*crystal);
            }
        }

        if !self.fell_out && self.is_out_of_bounds() {
            self.fell_out = true;
            log::info!("Player fell out of the world on level {}", self.level);
            self.events.push(GameEvent::FellOutOfWorld);
        }
    }

    /// Player's top edge is below the viewport plus the configured margin
    pub fn is_out_of_bounds(&self) -> bool {
        self.player.pos.y > self.viewport.height + self.settings.fall_margin
    }

    /// Player has drifted past the right edge of the last island
    pub fn reached_end(&self) -> bool {
        self.tiles
            .last()
            .is_some_and(|last| self.player.pos.x > last.bounds.right())
    }

    pub fn remaining_crystals(&self) -> usize {
        self.crystals.iter().filter(|c| !c.is_collected()).count()
    }

    /// Trigger the player's celebration overlay
    pub fn celebrate(&mut self) {
        self.player.celebrate(&mut self.rng);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw everything back to front
    pub fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        let width = self.viewport.width;
        let sky = Rect::new(0.0, 0.0, width, self.viewport.height);
        if !blit_asset(target, assets, &format!("sky_{}", self.biome.as_str()), sky, 1.0) {
            target.fill_rect(sky, colors::SKY);
        }

        let shift = -(self.scroll_offset * BACKGROUND_PARALLAX).rem_euclid(width);
        for decoration in &self.background {
            decoration.draw_offset(target, assets, Vec2::new(shift, 0.0));
            // Second copy fills the gap left by the wrap
            decoration.draw_offset(target, assets, Vec2::new(shift + width, 0.0));
        }
        for object in &self.atmosphere {
            object.draw(target, assets);
        }
        for tile in &self.tiles {
            tile.draw(target, assets);
        }
        for crystal in &self.crystals {
            crystal.draw(target, assets);
        }
        self.player.draw(target, assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::render::{ImageHandle, MeshTarget};

    fn test_world() -> World {
        World::new(12345, Viewport::new(800.0, 600.0), Settings::default())
    }

    /// One island under the player, nothing else
    fn landing_fixture() -> World {
        let mut world = test_world();
        let mut rng = seeded_rng(1);
        world.tiles = vec![TerrainTile::new(
            1,
            Rect::new(100.0, 300.0, 200.0, 60.0),
            Biome::Jungle,
            &mut rng,
        )];
        world.crystals.clear();
        world.player.pos = Vec2::new(150.0, 260.0);
        world.player.velocity_y = 5.0;
        world
    }

    #[test]
    fn test_new_world_loads_level_one() {
        let mut world = test_world();
        assert_eq!(world.level(), 1);
        assert_eq!(world.biome(), Biome::Jungle);
        assert_eq!(world.tiles.len(), 4);
        assert!(!world.crystals.is_empty());
        assert!(!world.background.is_empty());
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::LevelLoaded {
                level: 1,
                biome: Biome::Jungle
            }]
        );
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_landing_snap() {
        let mut world = landing_fixture();
        world.tick_entities(SIM_DT);
        world.resolve_collisions(|_| {});

        assert_eq!(world.player.pos.y, 260.0);
        assert_eq!(world.player.velocity_y, 0.0);
        assert!(world.player.is_grounded);
        assert!(
            world
                .drain_events()
                .contains(&GameEvent::Landed { tile_id: 1 })
        );
    }

    #[test]
    fn test_stays_grounded_without_repeat_landed_events() {
        let mut world = landing_fixture();
        world.drain_events();
        for _ in 0..30 {
            world.tick_entities(SIM_DT);
            world.resolve_collisions(|_| {});
            assert!(world.player.is_grounded);
            assert_eq!(world.player.pos.y, 260.0);
        }
        let landed = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Landed { .. }))
            .count();
        assert_eq!(landed, 1);
        // Drift halts once supported: one airborne tick of drift only
        assert!((world.player.pos.x - 151.0).abs() < 1e-4);
    }

    #[test]
    fn test_unsupported_player_keeps_falling() {
        let mut world = landing_fixture();
        world.tiles.clear();
        world.tick_entities(SIM_DT);
        world.resolve_collisions(|_| {});
        assert!(!world.player.is_grounded);
        assert!(world.player.pos.y > 260.0);
    }

    #[test]
    fn test_collection_fires_once() {
        let mut world = landing_fixture();
        // Settle onto the island first so only pickups produce events below
        world.resolve_collisions(|_| {});
        assert!(
            world
                .drain_events()
                .contains(&GameEvent::Landed { tile_id: 1 })
        );

        world.crystals = vec![
            // ~29 units from the player center (170, 280)
            Crystal::new(10, Vec2::new(185.0, 255.0), Rarity::Rare, [1.0; 4]),
            // ~38 units, just outside the 35 unit reach
            Crystal::new(12, Vec2::new(185.0, 245.0), Rarity::Common, [1.0; 4]),
            // 130 units away
            Crystal::new(11, Vec2::new(300.0, 280.0), Rarity::Common, [1.0; 4]),
        ];

        let mut collected = Vec::new();
        world.resolve_collisions(|c| collected.push(c.id));
        world.resolve_collisions(|c| collected.push(c.id));

        assert_eq!(collected, vec![10]);
        assert!(world.crystals[0].is_collected());
        assert!(!world.crystals[1].is_collected());
        assert!(!world.crystals[2].is_collected());
        assert_eq!(world.remaining_crystals(), 2);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::CrystalCollected {
                id: 10,
                rarity: Rarity::Rare
            }]
        );
    }

    #[test]
    fn test_fell_out_signalled_once() {
        let mut world = landing_fixture();
        world.tiles.clear();
        world.drain_events();
        world.player.pos.y = 600.0 + world.settings.fall_margin + 1.0;
        assert!(world.is_out_of_bounds());

        world.resolve_collisions(|_| {});
        world.resolve_collisions(|_| {});
        let falls = world
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::FellOutOfWorld)
            .count();
        assert_eq!(falls, 1);

        // Next level re-arms the signal and puts the player back
        world.load_level(2);
        assert!(!world.is_out_of_bounds());
        assert_eq!(world.level(), 2);
        assert_eq!(world.biome(), Biome::Aquatic);
    }

    #[test]
    fn test_load_level_replaces_collections_keeps_player() {
        let mut world = test_world();
        world.player.max_trail = 5;
        world.player.pos = Vec2::new(999.0, 999.0);
        world.scroll_offset = 42.0;
        let old_first = world.tiles[0].id;

        world.load_level(3);
        assert_eq!(world.tiles.len(), 6);
        assert_ne!(world.tiles[0].id, old_first);
        assert_eq!(world.scroll_offset, 0.0);
        assert_eq!(world.player.pos, Vec2::new(100.0, 50.0));
        assert_eq!(world.player.max_trail, 5);
    }

    #[test]
    fn test_scroll_advances_by_speed() {
        let mut world = test_world();
        world.advance_scroll(SIM_DT);
        world.advance_scroll(SIM_DT);
        assert!((world.scroll_offset - 2.0 * world.settings.scroll_speed).abs() < 1e-4);
    }

    #[test]
    fn test_reached_end() {
        let mut world = landing_fixture();
        assert!(!world.reached_end());
        world.player.pos.x = 301.0;
        assert!(world.reached_end());
        world.tiles.clear();
        assert!(!world.reached_end());
    }

    #[test]
    fn test_particles_disabled_setting() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let mut world = World::new(1, Viewport::default(), settings);
        for _ in 0..120 {
            world.tick_entities(SIM_DT);
            world.resolve_collisions(|_| {});
        }
        assert!(world.player.trail.is_empty());
        assert!(world.crystals.iter().all(|c| c.particles.is_empty()));
    }

    #[test]
    fn test_footsteps_are_stochastic_dust() {
        let mut world = landing_fixture();
        let dust = world.tiles[0].footstep_color();
        world.player.max_trail = usize::MAX;
        world.resolve_collisions(|_| {});
        assert!(world.player.is_grounded);

        let mut quiet = 0;
        let mut dusty = 0;
        for _ in 0..200 {
            world.player.trail.clear();
            world.resolve_collisions(|_| {});
            let emitted = world.player.trail.len();
            assert!(emitted <= 3);
            if emitted == 0 {
                quiet += 1;
            } else {
                dusty += 1;
                assert!(world.player.trail.iter().all(|p| p.color == dust));
            }
        }
        assert!(quiet > 0, "footsteps fired on every pass");
        assert!(dusty > quiet, "{dusty} dusty vs {quiet} quiet");
    }

    #[test]
    fn test_zero_dt_is_not_a_tick() {
        let mut world = landing_fixture();
        world.celebrate();
        let before: Vec<f32> = world.player.trail.iter().map(|p| p.life).collect();
        let pos = world.player.pos;

        world.tick_entities(0.0);
        world.tick_entities(f32::NAN);
        world.tick_entities(-1.0);

        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.player.pos, pos);
        let after: Vec<f32> = world.player.trail.iter().map(|p| p.life).collect();
        assert_eq!(before, after);

        world.tick_entities(SIM_DT);
        assert_eq!(world.time_ticks, 1);
        assert!(world.player.trail.iter().all(|p| p.life < 1.0));
    }

    #[test]
    fn test_set_viewport_moves_fall_limit_and_generation() {
        let mut world = test_world();
        world.player.pos.y = 600.0 + world.settings.fall_margin + 50.0;
        assert!(world.is_out_of_bounds());

        world.set_viewport(Viewport::new(1280.0, 1000.0));
        assert_eq!(world.viewport(), Viewport::new(1280.0, 1000.0));
        assert!(!world.is_out_of_bounds());

        world.load_level(2);
        // Island tops come from the lower part of the taller viewport
        assert!(world.tiles.iter().all(|t| t.bounds.y >= 1000.0 * 0.45));

        world.set_viewport(Viewport::new(-5.0, 0.0));
        assert_eq!(world.viewport(), Viewport::default());
    }

    #[test]
    fn test_draw_fallback_and_assets() {
        let world = test_world();
        let mut target = MeshTarget::new();
        world.draw(&mut target, &AssetMap::new());
        assert!(target.triangle_count() > 0);
        assert!(target.blits.is_empty());

        let mut assets = AssetMap::new();
        assets.insert(
            "island_jungle",
            ImageHandle {
                id: 1,
                width: 200,
                height: 60,
            },
        );
        let mut target = MeshTarget::new();
        world.draw(&mut target, &assets);
        assert_eq!(target.blits.len(), world.tiles.len());

        // Sky goes first, full viewport
        assets.insert(
            "sky_jungle",
            ImageHandle {
                id: 2,
                width: 800,
                height: 600,
            },
        );
        let mut target = MeshTarget::new();
        world.draw(&mut target, &assets);
        assert_eq!(target.blits.len(), world.tiles.len() + 1);
        assert_eq!(target.blits[0].image.id, 2);
        assert_eq!(target.blits[0].dest, Rect::new(0.0, 0.0, 800.0, 600.0));
    }
}
