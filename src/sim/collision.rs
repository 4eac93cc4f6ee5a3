//! Collision tests
//!
//! Pure geometry, no state changes. The orchestrator in `state.rs` decides what
//! to do with a hit.

use glam::Vec2;

use crate::Rect;
use crate::consts::{LANDING_TOLERANCE, PICKUP_REACH};

/// Check whether a falling body rests on an island this tick
///
/// The body's bottom edge must lie in the island's band, from its top surface
/// down to its bottom edge plus `LANDING_TOLERANCE`, with horizontal overlap.
/// Bodies moving upward never land. Returns the snapped top `y` on contact.
pub fn landing_contact(body: &Rect, velocity_y: f32, tile: &Rect) -> Option<f32> {
    if velocity_y < 0.0 || !body.overlaps_x(tile) {
        return None;
    }

    let feet = body.bottom();
    if feet >= tile.y && feet <= tile.bottom() + LANDING_TOLERANCE {
        Some(tile.y - body.height)
    } else {
        None
    }
}

/// Pickup distance for a body of the given width
#[inline]
pub fn pickup_radius(body_width: f32) -> f32 {
    body_width / 2.0 + PICKUP_REACH
}

/// Center-to-center pickup test
pub fn pickup_hit(body: &Rect, item_center: Vec2) -> bool {
    body.center().distance(item_center) <= pickup_radius(body.width)
}
