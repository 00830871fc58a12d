//! Level tuning: mode schedule, timers, release thresholds and speeds
//!
//! Stored as JSON. Every field has a default, so a file only needs the
//! values it changes.

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::FULL_SPEED;

/// Errors from loading or validating level settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Low-item speed boost for angry pursuers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngryTier {
    /// Applies once this many items or fewer remain
    pub remaining_items: u32,
    pub multiplier: f32,
}

/// Speed multipliers applied to the full speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    /// Tiles per second
    pub full: f32,
    pub player: f32,
    /// Player speed while pursuers are frightened
    pub player_frightened: f32,
    pub pursuer: f32,
    pub frightened: f32,
    /// Pursuers inside a tunnel or the pen
    pub tunnel: f32,
    pub captured: f32,
    pub angry_1: AngryTier,
    /// Checked before `angry_1`
    pub angry_2: AngryTier,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            full: FULL_SPEED,
            player: 0.8,
            player_frightened: 0.9,
            pursuer: 0.75,
            frightened: 0.5,
            tunnel: 0.4,
            captured: 1.5,
            angry_1: AngryTier {
                remaining_items: 20,
                multiplier: 0.8,
            },
            angry_2: AngryTier {
                remaining_items: 10,
                multiplier: 0.85,
            },
        }
    }
}

/// Per-level tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Alternating Scatter/Chase phase lengths in seconds, Scatter first
    pub schedule: Vec<f32>,
    /// Seconds pursuers stay frightened after a power pellet
    pub fright_duration: f32,
    /// Countdown before anything moves at level start and after a respawn
    pub start_delay: f32,
    /// Items eaten before each pursuer may leave the pen
    pub release_thresholds: Vec<u32>,
    /// Hold further releases while one pursuer is still leaving the pen
    pub serial_release: bool,
    pub lives: u32,
    pub speeds: SpeedSettings,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            schedule: vec![7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0],
            fright_duration: 6.0,
            start_delay: 5.0,
            release_thresholds: vec![0, 7, 17, 32],
            serial_release: false,
            lives: 3,
            speeds: SpeedSettings::default(),
        }
    }
}

impl LevelSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded level settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.schedule.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(SettingsError::Invalid("schedule durations must be finite and non-negative".into()));
        }
        if self.fright_duration < 0.0 || self.start_delay < 0.0 {
            return Err(SettingsError::Invalid("timers must be non-negative".into()));
        }
        let s = &self.speeds;
        let multipliers = [
            s.player,
            s.player_frightened,
            s.pursuer,
            s.frightened,
            s.tunnel,
            s.captured,
            s.angry_1.multiplier,
            s.angry_2.multiplier,
        ];
        if !(s.full > 0.0) || multipliers.iter().any(|m| !(*m > 0.0)) {
            return Err(SettingsError::Invalid("speeds must be positive".into()));
        }
        Ok(())
    }
}
