//! Per-frame simulation tick
//!
//! Runs the fixed update order: input, scroll, entity updates, collisions.
//! Particle decay happens inside the entity updates.

use super::collectible::Crystal;
use super::state::World;

/// Host input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Glide signal, held for as long as gliding should last
    pub glide: bool,
    /// Start the celebration overlay (e.g. on level clear)
    pub celebrate: bool,
}

/// Advance the world by one frame of `dt` seconds
pub fn tick<F>(world: &mut World, input: &TickInput, dt: f32, on_collect: F)
where
    F: FnMut(&Crystal),
{
    if input.glide {
        world.player.start_gliding();
    } else {
        world.player.stop_gliding();
    }
    if input.celebrate {
        world.celebrate();
    }

    world.advance_scroll(dt);
    world.tick_entities(dt);
    world.resolve_collisions(on_collect);
}
