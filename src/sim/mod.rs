//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every update is scaled by an explicit dt
//! - Seeded RNG only
//! - Stable iteration order (generation order)
//! - Rendering goes through the abstract `render` adapter only

pub mod atmosphere;
pub mod collectible;
pub mod collision;
pub mod particle;
pub mod player;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod worldgen;

use rand::SeedableRng;

pub use atmosphere::{AtmosphereKind, AtmosphereObject, CloudSize, CraftKind};
pub use collectible::{Crystal, Rarity};
pub use collision::{landing_contact, pickup_hit, pickup_radius};
pub use particle::Particle;
pub use player::{MotionState, Player};
pub use state::{GameEvent, World};
pub use terrain::{Biome, Decoration, DecorationKind, TerrainTile};
pub use tick::{TickInput, tick};
pub use worldgen::{Level, WorldGenerator};

/// Seedable RNG used everywhere in the simulation
pub type SimRng = rand_pcg::Pcg32;

/// Create the simulation RNG for a seed
pub fn seeded_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Per-tick self update shared by every moving entity
pub trait Entity {
    fn update(&mut self, dt: f32, rng: &mut SimRng);
}
