//! Crystals: the collectible pickups hovering above islands

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{self, Particle};
use super::{Entity, SimRng};
use crate::Rect;
use crate::chance_for;
use crate::consts::{COLLECT_BURST_COUNT, CRYSTAL_SIZE, SHIMMER_CAP};
use crate::render::{AssetMap, Color, Drawable, RenderTarget, blit_asset, colors, with_alpha};
use crate::ticks_for;

/// Per-tick chance of a shimmer emission while idle
const SHIMMER_CHANCE: f32 = 0.15;
const SPIN_SPEED: f32 = 0.02;
const BOB_SPEED: f32 = 0.05;
const BOB_AMPLITUDE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
        }
    }
}

/// A collectible crystal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    pub id: u32,
    /// Center of the crystal's resting position (bobbing is visual only)
    pub pos: Vec2,
    pub size: f32,
    pub rarity: Rarity,
    pub color: Color,
    collected: bool,
    /// Radians, visual spin
    pub rotation: f32,
    pub bob_phase: f32,
    /// Shimmer and collection burst (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
}

impl Crystal {
    pub fn new(id: u32, pos: Vec2, rarity: Rarity, color: Color) -> Self {
        let size = match rarity {
            Rarity::Common => CRYSTAL_SIZE,
            Rarity::Rare => CRYSTAL_SIZE * 1.3,
        };
        Self {
            id,
            pos,
            size,
            rarity,
            color,
            collected: false,
            rotation: 0.0,
            bob_phase: pos.x * 0.01,
            particles: Vec::new(),
        }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Visual center including the idle bob
    pub fn display_center(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, self.bob_phase.sin() * BOB_AMPLITUDE)
    }

    pub fn asset_key(&self) -> String {
        format!("crystal_{}", self.rarity.as_str())
    }

    fn shimmer_color(&self) -> Color {
        match self.rarity {
            Rarity::Rare => colors::RARE_SPARKLE,
            Rarity::Common => self.color,
        }
    }

    /// Mark as collected and fire the ring burst
    ///
    /// One-way: returns `false` without side effects if already collected.
    pub fn collect(&mut self, rng: &mut SimRng, emit_particles: bool) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        if emit_particles {
            let color = self.shimmer_color();
            particle::radial_burst(
                &mut self.particles,
                rng,
                self.pos,
                COLLECT_BURST_COUNT,
                1.5..3.5,
                color,
            );
        }
        true
    }

    /// Idle animation with optional shimmer emission
    pub fn update_with(&mut self, dt: f32, rng: &mut SimRng, emit_particles: bool) {
        let steps = ticks_for(dt);
        self.rotation = (self.rotation + SPIN_SPEED * steps) % std::f32::consts::TAU;
        self.bob_phase = (self.bob_phase + BOB_SPEED * steps) % std::f32::consts::TAU;

        if emit_particles
            && !self.collected
            && self.particles.len() < SHIMMER_CAP
            && rng.random_bool(chance_for(SHIMMER_CHANCE, steps))
        {
            let color = self.shimmer_color();
            let half = self.size / 2.0;
            let origin = self.display_center();
            for _ in 0..rng.random_range(1..=2u32) {
                let offset = Vec2::new(rng.random_range(-half..half), rng.random_range(-half..half));
                let vel = Vec2::new(rng.random_range(-0.3..0.3), rng.random_range(-0.8..-0.2));
                self.particles.push(Particle::new(
                    origin + offset,
                    vel,
                    2.0,
                    0.02,
                    color,
                ));
            }
        }

        particle::update_all(&mut self.particles, dt);
    }
}

impl Entity for Crystal {
    fn update(&mut self, dt: f32, rng: &mut SimRng) {
        self.update_with(dt, rng, true);
    }
}

impl Drawable for Crystal {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        if !self.collected {
            let c = self.display_center();
            let half = self.size / 2.0;
            let bounds = Rect::new(c.x - half, c.y - half, self.size, self.size);
            if !blit_asset(target, assets, &self.asset_key(), bounds, 1.0) {
                // Spinning diamond; rotation squashes the horizontal extent
                let w = half * (0.4 + 0.6 * self.rotation.cos().abs());
                target.fill_path(
                    &[
                        Vec2::new(c.x, c.y - half),
                        Vec2::new(c.x + w, c.y),
                        Vec2::new(c.x, c.y + half),
                        Vec2::new(c.x - w, c.y),
                    ],
                    self.color,
                );
                target.fill_ellipse(
                    Vec2::new(c.x - w * 0.3, c.y - half * 0.3),
                    Vec2::splat(half * 0.2),
                    with_alpha([1.0, 1.0, 1.0, 1.0], 0.7),
                );
            }
        }

        // The collection burst keeps playing after the body disappears
        particle::draw_all(&self.particles, target, assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::render::{ImageHandle, MeshTarget};
    use crate::sim::seeded_rng;

    const GREEN: Color = [0.3, 1.0, 0.5, 1.0];

    #[test]
    fn test_collect_is_one_way() {
        let mut rng = seeded_rng(1);
        let mut crystal = Crystal::new(1, Vec2::new(100.0, 100.0), Rarity::Common, GREEN);
        assert!(crystal.collect(&mut rng, true));
        assert!(crystal.is_collected());
        assert_eq!(crystal.particles.len(), COLLECT_BURST_COUNT);

        // Second collection: no effect, no new particles
        assert!(!crystal.collect(&mut rng, true));
        assert_eq!(crystal.particles.len(), COLLECT_BURST_COUNT);
    }

    #[test]
    fn test_shimmer_respects_cap() {
        let mut rng = seeded_rng(2);
        let mut crystal = Crystal::new(1, Vec2::new(0.0, 0.0), Rarity::Rare, GREEN);
        for _ in 0..500 {
            crystal.update(SIM_DT, &mut rng);
            // One emission can add two on top of cap - 1
            assert!(crystal.particles.len() <= SHIMMER_CAP + 1);
        }
        assert!(!crystal.particles.is_empty());
    }

    #[test]
    fn test_no_shimmer_after_collection() {
        let mut rng = seeded_rng(3);
        let mut crystal = Crystal::new(1, Vec2::ZERO, Rarity::Common, GREEN);
        crystal.collect(&mut rng, false);
        for _ in 0..500 {
            crystal.update(SIM_DT, &mut rng);
            assert!(crystal.particles.is_empty());
        }
    }

    #[test]
    fn test_burst_drains_then_draw_is_noop() {
        let mut rng = seeded_rng(4);
        let mut crystal = Crystal::new(1, Vec2::ZERO, Rarity::Common, GREEN);
        crystal.collect(&mut rng, true);

        let mut target = MeshTarget::new();
        crystal.draw(&mut target, &AssetMap::new());
        assert!(target.triangle_count() > 0);

        // Burst particles decay 0.02/tick, gone well within 60 ticks
        for _ in 0..60 {
            crystal.update(SIM_DT, &mut rng);
        }
        assert!(crystal.particles.is_empty());

        let mut target = MeshTarget::new();
        crystal.draw(&mut target, &AssetMap::new());
        assert_eq!(target.triangle_count(), 0);
        assert!(target.blits.is_empty());
    }

    #[test]
    fn test_bob_is_visual_only() {
        let mut rng = seeded_rng(5);
        let mut crystal = Crystal::new(1, Vec2::new(50.0, 60.0), Rarity::Common, GREEN);
        for _ in 0..37 {
            crystal.update_with(SIM_DT, &mut rng, false);
        }
        assert_eq!(crystal.pos, Vec2::new(50.0, 60.0));
        assert!((crystal.display_center().y - 60.0).abs() <= BOB_AMPLITUDE + 1e-4);
    }

    #[test]
    fn test_draw_uses_rarity_asset() {
        let crystal = Crystal::new(1, Vec2::new(10.0, 10.0), Rarity::Rare, GREEN);
        let mut assets = AssetMap::new();
        assets.insert(
            "crystal_rare",
            ImageHandle {
                id: 3,
                width: 32,
                height: 32,
            },
        );
        let mut target = MeshTarget::new();
        crystal.draw(&mut target, &assets);
        assert_eq!(target.blits.len(), 1);
        assert_eq!(target.triangle_count(), 0);
    }
}
