//! Parallax sky dressing: clouds, balloons, aircraft and distant scenery
//!
//! Purely visual. Each object drifts left at a speed fixed by its kind and
//! wraps back to the right edge of its scroll span once fully off screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Entity, SimRng};
use crate::Rect;
use crate::render::{AssetMap, Drawable, RenderTarget, blit_asset, colors};
use crate::ticks_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftKind {
    Plane,
    Blimp,
}

/// Type and subtype of an atmosphere object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtmosphereKind {
    Cloud(CloudSize),
    Mountain,
    Balloon,
    Aircraft(CraftKind),
    Fence,
    Building,
}

impl AtmosphereKind {
    /// Leftward drift in units/tick
    pub fn speed(&self) -> f32 {
        match self {
            AtmosphereKind::Cloud(CloudSize::Small) => 0.5,
            AtmosphereKind::Cloud(CloudSize::Medium) => 0.35,
            AtmosphereKind::Cloud(CloudSize::Large) => 0.2,
            AtmosphereKind::Mountain => 0.05,
            AtmosphereKind::Balloon => 0.3,
            AtmosphereKind::Aircraft(CraftKind::Plane) => 2.0,
            AtmosphereKind::Aircraft(CraftKind::Blimp) => 0.8,
            AtmosphereKind::Fence => 0.6,
            AtmosphereKind::Building => 0.1,
        }
    }

    /// Nominal (width, height)
    pub fn size(&self) -> Vec2 {
        match self {
            AtmosphereKind::Cloud(CloudSize::Small) => Vec2::new(60.0, 30.0),
            AtmosphereKind::Cloud(CloudSize::Medium) => Vec2::new(100.0, 45.0),
            AtmosphereKind::Cloud(CloudSize::Large) => Vec2::new(160.0, 65.0),
            AtmosphereKind::Mountain => Vec2::new(240.0, 140.0),
            AtmosphereKind::Balloon => Vec2::new(40.0, 60.0),
            AtmosphereKind::Aircraft(CraftKind::Plane) => Vec2::new(70.0, 24.0),
            AtmosphereKind::Aircraft(CraftKind::Blimp) => Vec2::new(120.0, 40.0),
            AtmosphereKind::Fence => Vec2::new(80.0, 24.0),
            AtmosphereKind::Building => Vec2::new(60.0, 70.0),
        }
    }

    pub fn asset_key(&self) -> &'static str {
        match self {
            AtmosphereKind::Cloud(CloudSize::Small) => "cloud_small",
            AtmosphereKind::Cloud(CloudSize::Medium) => "cloud_medium",
            AtmosphereKind::Cloud(CloudSize::Large) => "cloud_large",
            AtmosphereKind::Mountain => "mountain_distant",
            AtmosphereKind::Balloon => "balloon_hot_air",
            AtmosphereKind::Aircraft(CraftKind::Plane) => "aircraft_plane",
            AtmosphereKind::Aircraft(CraftKind::Blimp) => "aircraft_blimp",
            AtmosphereKind::Fence => "fence_wooden",
            AtmosphereKind::Building => "building_house",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereObject {
    pub kind: AtmosphereKind,
    pub bounds: Rect,
    pub speed: f32,
    /// Animation accumulator (bobbing, propeller spin)
    pub phase: f32,
    /// Right edge the object re-enters from after leaving on the left
    pub wrap_width: f32,
}

impl AtmosphereObject {
    pub fn new(kind: AtmosphereKind, pos: Vec2, wrap_width: f32) -> Self {
        let size = kind.size();
        Self {
            kind,
            bounds: Rect::new(pos.x, pos.y, size.x, size.y),
            speed: kind.speed(),
            phase: 0.0,
            wrap_width,
        }
    }

    /// Advance drift and animation by `dt`
    pub fn advance(&mut self, dt: f32) {
        let steps = ticks_for(dt);
        self.bounds.x -= self.speed * steps;
        self.phase = (self.phase + 0.05 * steps) % std::f32::consts::TAU;
        if self.bounds.right() < 0.0 {
            self.bounds.x = self.wrap_width;
        }
    }

    /// Vertical sway for floating objects
    fn sway(&self) -> f32 {
        match self.kind {
            AtmosphereKind::Balloon => self.phase.sin() * 4.0,
            AtmosphereKind::Aircraft(CraftKind::Blimp) => self.phase.sin() * 2.0,
            _ => 0.0,
        }
    }
}

impl Entity for AtmosphereObject {
    fn update(&mut self, dt: f32, _rng: &mut SimRng) {
        self.advance(dt);
    }
}

impl Drawable for AtmosphereObject {
    fn draw(&self, target: &mut dyn RenderTarget, assets: &AssetMap) {
        let b = self.bounds.translated(Vec2::new(0.0, self.sway()));
        if blit_asset(target, assets, self.kind.asset_key(), b, 1.0) {
            return;
        }

        let c = b.center();
        match self.kind {
            AtmosphereKind::Cloud(_) => {
                // Three overlapping puffs
                let r = Vec2::new(b.width * 0.3, b.height * 0.45);
                target.fill_ellipse(Vec2::new(b.x + b.width * 0.3, c.y + b.height * 0.1), r, colors::CLOUD);
                target.fill_ellipse(Vec2::new(c.x, c.y - b.height * 0.1), r * 1.15, colors::CLOUD);
                target.fill_ellipse(Vec2::new(b.x + b.width * 0.7, c.y + b.height * 0.1), r, colors::CLOUD);
            }
            AtmosphereKind::Mountain => {
                target.fill_path(
                    &[
                        Vec2::new(b.x, b.bottom()),
                        Vec2::new(c.x, b.y),
                        Vec2::new(b.right(), b.bottom()),
                    ],
                    colors::MOUNTAIN,
                );
            }
            AtmosphereKind::Balloon => {
                target.fill_ellipse(
                    Vec2::new(c.x, b.y + b.height * 0.35),
                    Vec2::new(b.width / 2.0, b.height * 0.35),
                    colors::BALLOON,
                );
                target.fill_rect(
                    Rect::new(c.x - b.width * 0.15, b.bottom() - b.height * 0.15, b.width * 0.3, b.height * 0.15),
                    colors::BASKET,
                );
            }
            AtmosphereKind::Aircraft(CraftKind::Plane) => {
                target.fill_ellipse(c, Vec2::new(b.width / 2.0, b.height * 0.2), colors::AIRCRAFT);
                target.fill_path(
                    &[
                        Vec2::new(c.x - b.width * 0.1, c.y),
                        Vec2::new(c.x + b.width * 0.1, b.y),
                        Vec2::new(c.x + b.width * 0.2, c.y),
                    ],
                    colors::AIRCRAFT,
                );
            }
            AtmosphereKind::Aircraft(CraftKind::Blimp) => {
                target.fill_ellipse(c, Vec2::new(b.width / 2.0, b.height / 2.0), colors::AIRCRAFT);
            }
            AtmosphereKind::Fence => {
                target.fill_rect(Rect::new(b.x, c.y, b.width, 3.0), colors::WOOD);
            }
            AtmosphereKind::Building => {
                target.fill_rect(b, colors::BUILDING);
            }
        }
    }
}
