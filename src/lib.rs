//! Neon Arena - a top-down arena shooter with a time-rewind ability
//!
//! Core modules:
//! - `sim`: Simulation (entities, history buffer, ability, collisions, tick)
//! - `renderer`: Rendering contract and a headless implementation
//! - `audio`: Sound bank and playback with graceful degradation
//! - `assets`: Best-effort sprite loading
//! - `platform`: Clock and input abstraction
//! - `game`: Frame-paced orchestrator

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, AudioError};
pub use game::Game;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the main loop
    pub const TARGET_FPS: u32 = 60;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults (speed is per tick, not per second)
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_MAX_HP: i32 = 5;

    /// Bullets
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_COOLDOWN_MS: u64 = 200;

    /// Enemies
    pub const ENEMY_SPEED_MIN: f32 = 1.5;
    pub const ENEMY_SPEED_MAX: f32 = 3.0;
    pub const ENEMY_RADIUS: f32 = 16.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 1200;

    /// Time-rewind powerup
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 12_000;
    /// Chance that an eligible spawn interval actually produces a powerup
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.7;

    /// How far back a rewind reaches
    pub const REWIND_DURATION_MS: u64 = 5000;
    /// Length of the rewind scrub animation
    pub const REWIND_ANIM_DURATION_MS: u64 = 2000;
    /// Delay between pickup and the ability becoming usable
    pub const ABILITY_CHARGE_TIME_MS: u64 = 5000;
    /// Extra history kept beyond the rewind window
    pub const HISTORY_SLACK_MS: u64 = 2000;

    /// Points per enemy killed by a bullet
    pub const KILL_SCORE: u64 = 10;
}

/// Playfield size as a vector
#[inline]
pub fn screen_size() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH, consts::SCREEN_HEIGHT)
}

/// Unit vector of `v`, or zero when `v` has no length
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// Clamp a circle center so the whole circle stays inside `[0, bounds]`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, radius: f32, bounds: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.max(radius).min(bounds.x - radius),
        pos.y.max(radius).min(bounds.y - radius),
    )
}

/// Strict circle-circle overlap (touching circles do not collide)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}
