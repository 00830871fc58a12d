//! Maze Chase - simulation core for a maze-chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, actors, mode director, tick loop)
//! - `settings`: Data-driven level tuning
//!
//! Rendering, audio, input polling and map-file loading live outside this
//! crate. The host feeds a desired direction in and reads positions, modes
//! and flags back out after each tick.

pub mod settings;
pub mod sim;

pub use settings::{AngryTier, LevelSettings, SettingsError, SpeedSettings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz keeps per-tick displacement inside the turn windows)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will accept before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Base actor speed in tiles per second; every multiplier scales this
    pub const FULL_SPEED: f32 = 7.5;

    /// Turn-commit window around a tile center for the player
    pub const PLAYER_TURN_THRESHOLD: f32 = 0.05;
    /// Turn-commit window for pursuers at normal speeds
    pub const PURSUER_TURN_THRESHOLD: f32 = 0.05;
    /// Wider window for fast pursuers so a single tick can't jump over a tile center
    pub const PURSUER_FAST_TURN_THRESHOLD: f32 = 0.1;
    /// Speed at or above which pursuers use the wide window
    pub const FAST_PURSUER_SPEED: f32 = FULL_SPEED * 1.25;

    /// Collision footprints (square side length, anchored at the actor position)
    pub const PLAYER_FOOTPRINT: f32 = 1.0;
    pub const PURSUER_FOOTPRINT: f32 = 0.8;

    /// A pursuer counts as "at" a target when closer than this
    pub const TARGET_REACHED_DISTANCE: f32 = 1.0;

    /// How far past the tunnel mouth an actor travels before wrapping
    pub const PLAYER_TUNNEL_MARGIN: f32 = 0.0;
    pub const PURSUER_TUNNEL_MARGIN: f32 = 0.5;

    /// How long the eating flag stays up after the last item (seconds)
    pub const EATING_DURATION: f32 = 0.5;
    /// Death animation length before a life is spent (seconds)
    pub const DEATH_DURATION: f32 = 1.5;

    /// Score values
    pub const PELLET_POINTS: u64 = 10;
    pub const POWER_PELLET_POINTS: u64 = 50;
    /// First capture in a fright; doubles for each further capture
    pub const CAPTURE_BASE_POINTS: u64 = 200;
}

/// Round both coordinates to the nearest tile
#[inline]
pub fn snap_to_tile(pos: Vec2) -> Vec2 {
    pos.round()
}

/// Largest per-axis distance from `pos` to its nearest tile center
#[inline]
pub fn tile_offset(pos: Vec2) -> f32 {
    (pos - pos.round()).abs().max_element()
}

/// True when both coordinates are strictly within `threshold` of a whole tile
#[inline]
pub fn near_tile_center(pos: Vec2, threshold: f32) -> bool {
    tile_offset(pos) < threshold
}
