//! Neon Core - A top-down neon arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation engine (entities, enemy behaviors, bosses, upgrades, tick pipeline)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Draw pass onto a 2D raster surface
//! - `platform`: Input mapping, storage backends, frame pacing
//! - `persistence`: Player profile with schema migration
//! - `settings`: User preferences

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::Profile;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal tick length in milliseconds (60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Nominal tick length in seconds
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 450.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = FIELD_HEIGHT * 0.8;
    /// Milliseconds between shots
    pub const INITIAL_FIRE_RATE: f32 = 200.0;
    pub const MIN_FIRE_RATE: f32 = 40.0;
    pub const INITIAL_DAMAGE: f32 = 2.0;
    pub const INITIAL_BULLET_SIZE: f32 = 5.0;
    pub const INITIAL_HEARTS: u32 = 3;
    pub const MAX_HEARTS: u32 = 10;
    /// Invincibility window after a hit (ms)
    pub const INVINCIBLE_TIME: f32 = 1500.0;
    /// Scale a damaged heart bounces to
    pub const HEART_BOUNCE_SCALE: f32 = 1.4;

    /// Frames without a kill before the mercy boost starts climbing
    pub const MERCY_IDLE_FRAMES: u64 = 1800;
    pub const MERCY_STEP_FRAMES: u64 = 300;
    pub const MERCY_STEP: f32 = 0.1;

    /// Boss every N levels
    pub const BOSS_TIER_SIZE: u32 = 5;
    /// Hazard spawn cadence (frames)
    pub const HAZARD_INTERVAL: u64 = 300;

    /// Pickup magnet capture radius
    pub const MAGNET_RADIUS: f32 = 220.0;
    pub const GEM_PULL_SPEED: f32 = 16.0;
    pub const HEART_PULL_SPEED: f32 = 10.0;

    /// Default cosmetic particle cap
    pub const MAX_PARTICLES: usize = 180;
}

/// Unit direction and distance from `from` to `to`.
///
/// A zero distance is replaced by 1 in the denominator, so coincident
/// points yield a zero vector instead of NaN.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    let denom = if dist > 0.0 { dist } else { 1.0 };
    (delta / denom, dist)
}

/// Convert polar (r, theta) to cartesian offset
#[inline]
pub fn polar(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
