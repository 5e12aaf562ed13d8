//! Duskswarm - a top-down survival action combat core
//!
//! Core module:
//! - `sim`: the complete gameplay simulation (entities, weapons, bosses,
//!   waves, upgrades)
//!
//! Rendering, audio, and raw input capture are host concerns. The host owns
//! a [`sim::GameState`], calls [`sim::tick`] once per frame with the elapsed
//! delta time and a [`sim::TickInput`] built from key state, reads the state
//! back as a plain-data snapshot to draw, and drains [`sim::GameEvent`]s to
//! drive menus and HUD.

pub mod sim;

pub use sim::{GameState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World bounds (the arena the camera pans across)
    pub const WORLD_WIDTH: f32 = 2400.0;
    pub const WORLD_HEIGHT: f32 = 1800.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 180.0;
    /// Gems inside this radius are gained immediately
    pub const PLAYER_COLLECT_RADIUS: f32 = 28.0;
    /// Base magnet pull radius, before any power-up
    pub const PLAYER_MAGNET_RADIUS: f32 = 60.0;

    /// Dash burst
    pub const DASH_DURATION: f32 = 0.18;
    pub const DASH_COOLDOWN: f32 = 2.0;
    pub const DASH_MULTIPLIER: f32 = 3.2;

    /// Contact damage per overlapping enemy per tick (stacks, uncapped)
    pub const CONTACT_DAMAGE: f32 = 5.0;

    /// Enemy separation steering
    pub const SEPARATION_FACTOR: f32 = 1.5;
    pub const SEPARATION_STRENGTH: f32 = 100.0;

    /// Death drops
    pub const GEM_VALUE: u32 = 10;
    pub const GEM_TTL: f32 = 90.0;
    pub const MAGNET_DROP_CHANCE: f32 = 0.1;
    pub const MAGNET_PICKUP_TTL: f32 = 12.0;
    pub const MAGNET_RADIUS: f32 = 420.0;
    pub const MAGNET_DURATION: f32 = 6.0;
    pub const MAGNET_PULL_SPEED: f32 = 520.0;

    /// Wave cadence
    pub const WAVE_DURATION: f32 = 60.0;
    pub const SPAWN_INTERVAL_START: f32 = 2.0;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.5;
    /// How far outside the camera edge enemies appear
    pub const SPAWN_MARGIN: f32 = 48.0;
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    /// Defeating this wave's boss wins the run
    pub const FINAL_BOSS_WAVE: u32 = 20;

    /// Boss phase scaling
    pub const BOSS_PHASE_SPEED_SCALE: f32 = 1.15;
    pub const BOSS_PHASE_COOLDOWN_SCALE: f32 = 0.8;
    pub const BOSS_SPECIAL_COOLDOWN: f32 = 4.0;

    /// Vendor interaction radius (opens/closes the shop)
    pub const VENDOR_RADIUS: f32 = 56.0;

    /// XP needed for the first level-up; grows per level
    pub const XP_BASE_THRESHOLD: u32 = 50;
    pub const XP_THRESHOLD_GROWTH: u32 = 25;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit direction from `from` toward `to`, zero when coincident
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp a position into the world rectangle, inset by `radius`
pub fn clamp_to_world(pos: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, consts::WORLD_WIDTH - radius),
        pos.y.clamp(radius, consts::WORLD_HEIGHT - radius),
    )
}
