//! Glide Isles headless runner
//!
//! Drives the simulation with a scripted pilot and renders every frame into an
//! in-memory mesh. Usage: `glide-isles [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use glide_isles::Settings;
#[cfg(not(target_arch = "wasm32"))]
use glide_isles::sim::World;

/// Frames to simulate (one minute at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAMES: u32 = 3600;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x6c69_6465;
/// Host-side walking speed while standing on an island (units/tick)
#[cfg(not(target_arch = "wasm32"))]
const WALK_SPEED: f32 = 2.0;
/// Upward launch at an island's edge; with a held glide this carries the
/// player across the widest gap
#[cfg(not(target_arch = "wasm32"))]
const HOP_SPEED: f32 = 19.0;

/// Scripted stand-in for keyboard input
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Pilot {
    /// Launched from an island and not yet down again
    hopping: bool,
    /// Frames left before the next level loads (celebration in progress)
    clear_countdown: Option<u32>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Pilot {
    /// Glide through the whole hop; the spawn drop is a plain fall
    fn wants_glide(&self) -> bool {
        self.hopping
    }

    /// Walk toward the island's right edge and hop from it. On the last island
    /// the pilot walks straight off to clear the level.
    fn steer(&mut self, world: &mut World) {
        if !world.player.is_grounded {
            return;
        }
        self.hopping = false;
        let body = world.player.bounds();
        let Some(index) = world.tiles.iter().position(|t| t.bounds.overlaps_x(&body)) else {
            return;
        };
        let edge = world.tiles[index].bounds.right();
        let is_last = index + 1 == world.tiles.len();
        if !is_last && body.x + WALK_SPEED >= edge - 1.0 {
            world.player.velocity_y = -HOP_SPEED;
            self.hopping = true;
        } else {
            world.player.pos.x += WALK_SPEED;
        }
    }
}

/// Totals reported at the end of a run
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Summary {
    collected: u32,
    rare: u32,
    levels_cleared: u32,
    falls: u32,
    peak_triangles: usize,
}

/// Drive `world` for `frames` frames, drawing each into a mesh
#[cfg(not(target_arch = "wasm32"))]
fn run(world: &mut World, pilot: &mut Pilot, frames: u32) -> Summary {
    use glide_isles::consts::{CELEBRATION_TICKS, SIM_DT};
    use glide_isles::render::{AssetMap, MeshTarget};
    use glide_isles::sim::{GameEvent, Rarity, TickInput, tick};

    let assets = AssetMap::new();
    let mut target = MeshTarget::new();
    let mut summary = Summary::default();

    for _ in 0..frames {
        let input = TickInput {
            glide: pilot.wants_glide(),
            celebrate: false,
        };
        tick(world, &input, SIM_DT, |crystal| {
            summary.collected += 1;
            if crystal.rarity == Rarity::Rare {
                summary.rare += 1;
            }
        });

        target.clear();
        world.draw(&mut target, &assets);
        summary.peak_triangles = summary.peak_triangles.max(target.triangle_count());

        for event in world.drain_events() {
            match event {
                GameEvent::FellOutOfWorld if pilot.clear_countdown.is_none() => {
                    summary.falls += 1;
                    let level = world.level();
                    world.load_level(level);
                    pilot.hopping = false;
                }
                GameEvent::Landed { tile_id } => log::debug!("Landed on island {}", tile_id),
                _ => {}
            }
        }

        if let Some(frames) = pilot.clear_countdown {
            if frames == 0 {
                *pilot = Pilot::default();
                let next = world.level() + 1;
                world.load_level(next);
            } else {
                pilot.clear_countdown = Some(frames - 1);
            }
        } else if world.reached_end() {
            summary.levels_cleared += 1;
            log::info!("Cleared level {}", world.level());
            world.celebrate();
            // Hold the next level until the overlay has played out
            pilot.clear_countdown = Some(CELEBRATION_TICKS as u32);
        } else {
            pilot.steer(world);
        }
    }

    summary
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glide_isles::Viewport;

    env_logger::init();
    log::info!("Glide Isles (headless) starting...");

    let settings = load_settings();
    let seed = settings.seed.unwrap_or(DEFAULT_SEED);
    log::info!("Using seed: {}", seed);

    let mut world = World::new(seed, Viewport::default(), settings);
    let summary = run(&mut world, &mut Pilot::default(), DEMO_FRAMES);

    log::info!(
        "Finished {} frames: level {}, {} cleared, {} falls, {} crystals ({} rare), peak {} triangles",
        DEMO_FRAMES,
        world.level(),
        summary.levels_cleared,
        summary.falls,
        summary.collected,
        summary.rare,
        summary.peak_triangles
    );
}

/// Settings from the optional first argument, defaults otherwise
#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings from {}: {}, using defaults", path, e);
            Settings::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
