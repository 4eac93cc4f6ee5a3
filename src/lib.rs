//! Glide Isles - a floating-island gliding platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, collisions, particles)
//! - `render`: Abstract drawing target, asset lookup and a tessellating fallback target
//! - `settings`: Data-driven configuration
//! - `error`: Configuration errors

pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation constants
///
/// Per-tick values are expressed for a nominal 60 Hz tick and scaled by
/// [`ticks_for`] at runtime.
pub mod consts {
    /// Nominal ticks per second all per-tick deltas are tuned for
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep matching one nominal tick
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Largest dt a single update will integrate (prevents tunneling through tiles)
    pub const MAX_DT: f32 = 4.0 / TICK_RATE;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 50.0;
    pub const GRAVITY: f32 = 0.3;
    /// Gravity multiplier while gliding
    pub const GLIDE_GRAVITY_SCALE: f32 = 0.5;
    /// Terminal fall speed (units/tick)
    pub const MAX_FALL_SPEED: f32 = 8.0;
    /// Horizontal drift while airborne (units/tick)
    pub const AIR_DRIFT_SPEED: f32 = 1.0;
    /// Ticks between animation frame advances
    pub const ANIMATION_INTERVAL: f32 = 8.0;
    /// Celebration overlay duration (ticks)
    pub const CELEBRATION_TICKS: f32 = 30.0;

    /// Landing band tolerance below a tile's bottom edge
    pub const LANDING_TOLERANCE: f32 = 10.0;
    /// Extra pickup reach added to half the player width
    pub const PICKUP_REACH: f32 = 15.0;

    /// Generation
    pub const TILE_GAP_MIN: f32 = 200.0;
    pub const TILE_GAP_MAX: f32 = 300.0;
    pub const TILE_MIN_WIDTH: f32 = 120.0;
    pub const FIRST_TILE_X: f32 = 60.0;
    pub const CRYSTAL_HOVER: f32 = 40.0;
    pub const CRYSTAL_SIZE: f32 = 18.0;
    pub const RARE_CHANCE: f64 = 0.2;
    pub const CLOUD_COUNT: usize = 6;

    /// Particles
    pub const AMBIENT_GRAVITY: f32 = 0.05;
    pub const MIN_PARTICLE_RADIUS: f32 = 0.1;
    pub const COLLECT_BURST_COUNT: usize = 12;
    pub const CELEBRATION_BURST_COUNT: usize = 10;
    pub const SHIMMER_CAP: usize = 8;

    /// Default world scroll speed (units/tick)
    pub const SCROLL_SPEED: f32 = 2.0;
}

/// Convert a frame delta (seconds) into nominal ticks elapsed
///
/// Non-finite deltas count as no time at all.
#[inline]
pub fn ticks_for(dt: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, consts::MAX_DT) * consts::TICK_RATE
}

/// Scale a per-tick probability to `steps` ticks
#[inline]
pub fn chance_for(per_tick: f32, steps: f32) -> f64 {
    (per_tick * steps).clamp(0.0, 1.0) as f64
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap on the x axis
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Host viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace non-positive dimensions with a sane default
    pub fn sanitized(self) -> Self {
        if self.width > 0.0 && self.height > 0.0 {
            return self;
        }
        log::warn!(
            "Non-positive viewport {}x{}, falling back to 800x600",
            self.width,
            self.height
        );
        Self::default()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
