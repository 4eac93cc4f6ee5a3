//! The player glider
//!
//! Motion is a small state machine: `Falling` by default, `Gliding` while the
//! host holds the glide signal, `Grounded` whenever the collision pass finds an
//! island underneath. Celebration is an overlay that only swaps the animation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{self, Particle};
use super::{Entity, SimRng};
use crate::consts::*;
use crate::render::{AssetMap, Color, Drawable, RenderTarget, blit_asset, colors};
use crate::{Rect, chance_for, ticks_for};

/// Per-tick chance of dropping a trail particle while gliding
const TRAIL_CHANCE: f32 = 0.3;

/// Underlying motion state (celebration is tracked separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Falling,
    Gliding,
    Grounded,
}

impl MotionState {
    /// Frames in this state's animation row
    pub fn frame_count(&self) -> u8 {
        match self {
            MotionState::Gliding => 4,
            MotionState::Falling => 3,
            MotionState::Grounded => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionState::Falling => "falling",
            MotionState::Gliding => "gliding",
            MotionState::Grounded => "idle",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub gravity: f32,
    pub is_grounded: bool,
    pub is_gliding: bool,
    /// Current frame within the animation row
    pub frame: u8,
    /// Ticks accumulated toward the next frame
    pub frame_timer: f32,
    /// Ticks left in the celebration overlay (0 = inactive)
    pub celebrate_timer: f32,
    /// Cap on live trail particles (0 disables emission)
    pub max_trail: usize,
    /// Trail, footstep and celebration particles
    #[serde(skip)]
    pub trail: Vec<Particle>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            velocity_y: 0.0,
            gravity: GRAVITY,
            is_grounded: false,
            is_gliding: false,
            frame: 0,
            frame_timer: 0.0,
            celebrate_timer: 0.0,
            max_trail: usize::MAX,
            trail: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn motion_state(&self) -> MotionState {
        if self.is_grounded {
            MotionState::Grounded
        } else if self.is_gliding {
            MotionState::Gliding
        } else {
            MotionState::Falling
        }
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrate_timer > 0.0
    }

    pub fn start_gliding(&mut self) {
        self.is_gliding = true;
    }

    pub fn stop_gliding(&mut self) {
        self.is_gliding = false;
    }

    /// Move back to the start for a new level; the trail is dropped
    pub fn reset(&mut self) {
        self.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.velocity_y = 0.0;
        self.is_grounded = false;
        self.is_gliding = false;
        self.frame = 0;
        self.frame_timer = 0.0;
        self.celebrate_timer = 0.0;
        self.trail.clear();
    }

    /// Start the celebration overlay with a one-time scatter burst
    pub fn celebrate(&mut self, rng: &mut SimRng) {
        self.celebrate_timer = CELEBRATION_TICKS;
        let count = CELEBRATION_BURST_COUNT.min(self.trail_room());
        let center = self.center();
        particle::scatter_burst(
            &mut self.trail,
            rng,
            center,
            count,
            1.0..4.0,
            colors::CELEBRATION,
        );
    }

    /// Snap onto a surface whose top sits at `snapped_y + height`
    pub fn land(&mut self, snapped_y: f32) {
        self.pos.y = snapped_y;
        self.velocity_y = 0.0;
        self.is_grounded = true;
    }

    /// Kick up 1-3 dust particles at the feet
    pub fn emit_footsteps(&mut self, rng: &mut SimRng, color: Color) {
        let room = self.trail_room();
        if room == 0 {
            return;
        }
        let feet = Vec2::new(self.center().x, self.pos.y + self.size.y);
        let count = rng.random_range(1..=3usize).min(room);
        for _ in 0..count {
            let vel = Vec2::new(rng.random_range(-1.5..1.5), rng.random_range(-1.5..-0.3));
            self.trail.push(Particle::new(feet, vel, 3.0, 0.04, color));
        }
    }

    /// Particles that can still be added under `max_trail`
    fn trail_room(&self) -> usize {
        self.max_trail.saturating_sub(self.trail.len())
    }

    fn advance_animation(&mut self, steps: f32, state: MotionState) {
        let count = state.frame_count();
        self.frame_timer += steps;
        while self.frame_timer >= ANIMATION_INTERVAL {
            self.frame_timer -= ANIMATION_INTERVAL;
            self.frame = (self.frame + 1) % count;
        }
        // Mode switches can leave the index past a shorter row
        if self.frame >= count {
            self.frame %= count;
        }
    }

    pub fn asset_key(&self) -> String {
        if self.is_celebrating() {
            "player_celebrate".to_string()
        } else {
            format!("player_{}", self.motion_state().as_str())
        }
    }
}

impl Entity for Player {
    /// Integrate gravity and drift
    ///
    /// Grounded status from the previous tick halts horizontal drift, then is
    /// cleared so the collision pass can re-establish it.
    fn update(&mut self, dt: f32, rng: &mut SimRng) {
        let steps = ticks_for(dt);
        let was_grounded = self.is_grounded;
        let state = self.motion_state();
        self.is_grounded = false;

        let gravity = if self.is_gliding {
            self.gravity * GLIDE_GRAVITY_SCALE
        } else {
            self.gravity
        };
        self.velocity_y = (self.velocity_y + gravity * steps).min(MAX_FALL_SPEED);
        self.pos.y += self.velocity_y * steps;
        if !was_grounded {
            self.pos.x += AIR_DRIFT_SPEED * steps;
        }

        if self.is_gliding
            && !was_grounded
            && self.trail_room() > 0
            && rng.random_bool(chance_for(TRAIL_CHANCE, steps))
        {
            let tail = Vec2::new(self.pos.x, self.center().y);
            let vel = Vec2::new(-rng.random_range(0.2f32..0.8), rng.random_range(-0.2..0.2));
            self.trail.push(Particle::new(tail, vel, 3.0, 0.03, colors::TRAIL));
        }

        self.advance_animation(steps, state);
        if self.celebrate_timer > 0.0 {
            self.celebrate_timer = (self.celebrate_timer - steps).max(0.0);
        }

        particle::update_all(&mut self.trail, dt);
    }
}

impl Drawable for Player {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        particle::draw_all(&self.trail, target, assets);

        let b = self.bounds();
        if blit_asset(target, assets, &self.asset_key(), b, 1.0) {
            return;
        }

        let body = if self.is_celebrating() {
            colors::PLAYER_CELEBRATE
        } else {
            colors::PLAYER_BODY
        };
        let c = b.center();
        if self.motion_state() == MotionState::Gliding {
            // Wings flap with the animation frame
            let lift = (self.frame as f32 - 1.5) * 3.0;
            target.fill_path(
                &[
                    Vec2::new(b.x - b.width * 0.3, c.y + lift),
                    Vec2::new(c.x, c.y - b.height * 0.1),
                    Vec2::new(b.right() + b.width * 0.3, c.y + lift),
                    Vec2::new(c.x, c.y + b.height * 0.15),
                ],
                colors::PLAYER_WING,
            );
        }
        target.fill_ellipse(c, Vec2::new(b.width / 2.0, b.height / 2.0), body);
        target.fill_ellipse(
            Vec2::new(c.x + b.width * 0.2, c.y - b.height * 0.1),
            Vec2::splat(b.width * 0.08),
            [0.1, 0.1, 0.1, 1.0],
        );
    }
}
