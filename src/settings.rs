//! Game settings and presentation config
//!
//! Read once at startup from the JSON file named by `NEON_ARENA_SETTINGS`.
//! Settings are never written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable holding the settings file path
pub const SETTINGS_ENV_VAR: &str = "NEON_ARENA_SETTINGS";

/// Look of one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityVisual {
    /// Fallback circle color (RGB)
    pub color: [u8; 3],
    /// Optional sprite, drawn instead of the circle when it loads
    #[serde(default)]
    pub sprite_path: Option<PathBuf>,
}

impl EntityVisual {
    fn new(color: [u8; 3], sprite_path: Option<&str>) -> Self {
        Self {
            color,
            sprite_path: sprite_path.map(PathBuf::from),
        }
    }
}

/// Sound file per sound key; `None` keeps that sound silent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPaths {
    pub shoot: Option<PathBuf>,
    pub powerup: Option<PathBuf>,
    pub enemy_kill: Option<PathBuf>,
    pub rewind_start: Option<PathBuf>,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visuals ===
    pub player: EntityVisual,
    pub enemy: EntityVisual,
    pub powerup: EntityVisual,
    pub bullet_color: [u8; 3],
    pub background_color: [u8; 3],
    /// Glow ring around the player while rewinding
    pub rewind_glow: bool,

    // === Audio ===
    pub sounds: SoundPaths,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Session ===
    /// RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// How long the headless demo runs before quitting
    pub demo_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: EntityVisual::new([80, 200, 255], Some("assets/player.png")),
            enemy: EntityVisual::new([255, 80, 120], Some("assets/enemy.png")),
            powerup: EntityVisual::new([180, 255, 180], None),
            bullet_color: [255, 230, 120],
            background_color: [15, 15, 25],
            rewind_glow: true,

            sounds: SoundPaths {
                shoot: Some(PathBuf::from("assets/laser.wav")),
                powerup: None,
                enemy_kill: None,
                rewind_start: Some(PathBuf::from("assets/rewind.wav")),
            },
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            seed: None,
            demo_seconds: 60,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings '{}': {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from '{}'", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the path in [`SETTINGS_ENV_VAR`], or use defaults
    pub fn load() -> Self {
        match std::env::var_os(SETTINGS_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Effective sound volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
