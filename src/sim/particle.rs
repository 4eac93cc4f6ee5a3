//! Short-lived visual particles
//!
//! Particles are owned by whatever emitted them (player trail, crystal
//! shimmer). Owners call [`update_all`] once per tick, which integrates,
//! decays and drops dead particles in one pass.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use crate::consts::{AMBIENT_GRAVITY, MIN_PARTICLE_RADIUS};
use crate::render::{AssetMap, Color, Drawable, RenderTarget, with_alpha};
use crate::ticks_for;

/// Smallest decay allowed, so life always strictly decreases
const MIN_DECAY: f32 = 0.001;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 0-1, decreases every tick
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub color: Color,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, decay: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            size,
            life: 1.0,
            decay: decay.max(MIN_DECAY),
            color,
        }
    }

    /// Integrate one update; returns whether the particle is still alive
    pub fn update(&mut self, dt: f32) -> bool {
        let steps = ticks_for(dt);
        self.vel.y += AMBIENT_GRAVITY * steps;
        self.pos += self.vel * steps;
        self.life -= self.decay * steps;
        self.is_alive()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw radius, never below the primitive minimum
    pub fn radius(&self) -> f32 {
        (self.size * self.life).max(MIN_PARTICLE_RADIUS)
    }

    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

impl Drawable for Particle {
    fn draw(&self, target: &mut dyn RenderTarget, _assets: &AssetMap) {
        let r = self.radius();
        target.fill_ellipse(self.pos, Vec2::splat(r), with_alpha(self.color, self.opacity()));
    }
}

/// Update every particle and remove the ones whose life ran out
pub fn update_all(particles: &mut Vec<Particle>, dt: f32) {
    particles.retain_mut(|p| p.update(dt));
}

pub fn draw_all(particles: &[Particle], target: &mut dyn RenderTarget, assets: &AssetMap) {
    for particle in particles {
        particle.draw(target, assets);
    }
}

/// Ring burst: `count` particles at even angular spacing, random speed
pub fn radial_burst(
    particles: &mut Vec<Particle>,
    rng: &mut SimRng,
    center: Vec2,
    count: usize,
    speed: std::ops::Range<f32>,
    color: Color,
) {
    for i in 0..count {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        let s = rng.random_range(speed.clone());
        let vel = Vec2::new(angle.cos(), angle.sin()) * s;
        particles.push(Particle::new(center, vel, 4.0, 0.02, color));
    }
}

/// Scatter burst: `count` particles at random angles and speeds
pub fn scatter_burst(
    particles: &mut Vec<Particle>,
    rng: &mut SimRng,
    center: Vec2,
    count: usize,
    speed: std::ops::Range<f32>,
    color: Color,
) {
    for _ in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let s = rng.random_range(speed.clone());
        let vel = Vec2::new(angle.cos(), angle.sin()) * s;
        particles.push(Particle::new(center, vel, 5.0, 0.015, color));
    }
}
