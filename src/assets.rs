//! Best-effort asset loading
//!
//! Every asset loads on its own; a failure is logged and leaves its slot
//! empty, and the renderer draws a plain circle instead.

use std::path::{Path, PathBuf};

use crate::consts::{ENEMY_RADIUS, PLAYER_RADIUS, POWERUP_RADIUS};
use crate::error::AssetError;
use crate::renderer::EntityKind;
use crate::settings::Settings;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Encoded sound formats the audio backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFormat {
    Wav,
    Ogg,
    Mp3,
}

/// A loaded sprite image, scaled to its entity's diameter when drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Target draw size in pixels (2 × radius)
    pub diameter: u32,
}

/// Raw sound data ready to hand to an audio backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundData {
    pub path: PathBuf,
    pub format: SoundFormat,
    pub bytes: Vec<u8>,
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a PNG sprite for an entity of the given radius
pub fn load_sprite(path: Option<&Path>, radius: f32) -> Result<Sprite, AssetError> {
    let path = path.ok_or(AssetError::NotConfigured)?;
    let bytes = read(path)?;
    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err(AssetError::Corrupt {
            path: path.to_path_buf(),
            kind: "PNG image",
            reason: "missing PNG signature".to_string(),
        });
    }
    Ok(Sprite {
        path: path.to_path_buf(),
        bytes,
        diameter: (radius * 2.0).round() as u32,
    })
}

/// Sniff the container format from the first bytes of a sound file
pub fn detect_sound_format(bytes: &[u8]) -> Option<SoundFormat> {
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        Some(SoundFormat::Wav)
    } else if bytes.starts_with(b"OggS") {
        Some(SoundFormat::Ogg)
    } else if bytes.starts_with(b"ID3")
        || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
    {
        Some(SoundFormat::Mp3)
    } else {
        None
    }
}

/// Load a sound file (WAV, OGG or MP3)
pub fn load_sound(path: Option<&Path>) -> Result<SoundData, AssetError> {
    let path = path.ok_or(AssetError::NotConfigured)?;
    let bytes = read(path)?;
    let format = detect_sound_format(&bytes).ok_or_else(|| AssetError::Corrupt {
        path: path.to_path_buf(),
        kind: "sound",
        reason: "unrecognized audio container".to_string(),
    })?;
    Ok(SoundData {
        path: path.to_path_buf(),
        format,
        bytes,
    })
}

/// Sprites for every entity kind that has one; empty slots fall back to shapes
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    pub player_sprite: Option<Sprite>,
    pub enemy_sprite: Option<Sprite>,
    pub powerup_sprite: Option<Sprite>,
}

impl AssetBundle {
    /// Load all configured sprites, logging (not failing) on errors
    pub fn load(settings: &Settings) -> Self {
        Self {
            player_sprite: load_slot(
                "player",
                settings.player.sprite_path.as_deref(),
                PLAYER_RADIUS,
            ),
            enemy_sprite: load_slot("enemy", settings.enemy.sprite_path.as_deref(), ENEMY_RADIUS),
            powerup_sprite: load_slot(
                "powerup",
                settings.powerup.sprite_path.as_deref(),
                POWERUP_RADIUS,
            ),
        }
    }

    pub fn sprite(&self, kind: EntityKind) -> Option<&Sprite> {
        match kind {
            EntityKind::Player => self.player_sprite.as_ref(),
            EntityKind::Enemy => self.enemy_sprite.as_ref(),
            EntityKind::Powerup => self.powerup_sprite.as_ref(),
            EntityKind::Bullet => None,
        }
    }
}

fn load_slot(name: &str, path: Option<&Path>, radius: f32) -> Option<Sprite> {
    match load_sprite(path, radius) {
        Ok(sprite) => {
            log::info!("Loaded {} sprite '{}'", name, sprite.path.display());
            Some(sprite)
        }
        Err(AssetError::NotConfigured) => None,
        Err(e) => {
            log::warn!("Sprite for {} unavailable, drawing a circle: {}", name, e);
            None
        }
    }
}
