//! Sound playback
//!
//! The audio device sits behind [`AudioBackend`]. If the backend cannot be
//! opened the whole session is silent; if a single sound fails to load only
//! that key is silent.

use std::collections::HashMap;
use std::path::Path;

use crate::assets::{SoundData, load_sound};
use crate::error::{AssetError, AudioError};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Bullet fired
    Shoot,
    /// Rewind powerup collected
    Powerup,
    /// Enemy destroyed by a bullet
    EnemyKill,
    /// Rewind animation started
    RewindStart,
}

impl SoundKey {
    pub const ALL: [SoundKey; 4] = [
        SoundKey::Shoot,
        SoundKey::Powerup,
        SoundKey::EnemyKill,
        SoundKey::RewindStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKey::Shoot => "shoot",
            SoundKey::Powerup => "powerup",
            SoundKey::EnemyKill => "enemy_kill",
            SoundKey::RewindStart => "rewind_start",
        }
    }

    /// The sound a simulation event triggers, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundKey> {
        match event {
            GameEvent::Shot => Some(SoundKey::Shoot),
            GameEvent::PowerupCollected => Some(SoundKey::Powerup),
            GameEvent::EnemyKilled => Some(SoundKey::EnemyKill),
            GameEvent::RewindStarted { .. } => Some(SoundKey::RewindStart),
            _ => None,
        }
    }

    fn configured_path(self, settings: &Settings) -> Option<&Path> {
        let sounds = &settings.sounds;
        match self {
            SoundKey::Shoot => sounds.shoot.as_deref(),
            SoundKey::Powerup => sounds.powerup.as_deref(),
            SoundKey::EnemyKill => sounds.enemy_kill.as_deref(),
            SoundKey::RewindStart => sounds.rewind_start.as_deref(),
        }
    }
}

/// An output device that can play decoded-on-demand sound data
pub trait AudioBackend {
    fn play(&mut self, key: SoundKey, sound: &SoundData, volume: f32);
}

/// Backend for headless runs: logs each playback instead of producing sound
#[derive(Debug, Default)]
pub struct HeadlessBackend;

impl HeadlessBackend {
    pub fn open() -> Result<Box<dyn AudioBackend>, AudioError> {
        Ok(Box::new(Self))
    }
}

impl AudioBackend for HeadlessBackend {
    fn play(&mut self, key: SoundKey, sound: &SoundData, volume: f32) {
        log::debug!(
            "Sound {} ({:?}, {} bytes) at volume {:.2}",
            key.as_str(),
            sound.format,
            sound.bytes.len(),
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    sounds: HashMap<SoundKey, SoundData>,
    volume: f32,
}

impl AudioManager {
    /// Wrap an opened (or failed) backend and load every configured sound.
    /// Sounds are only loaded when the backend is available.
    pub fn new(backend: Result<Box<dyn AudioBackend>, AudioError>, settings: &Settings) -> Self {
        let backend = match backend {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::warn!("{} - sounds disabled", e);
                None
            }
        };

        let mut sounds = HashMap::new();
        if backend.is_some() {
            for key in SoundKey::ALL {
                match load_sound(key.configured_path(settings)) {
                    Ok(sound) => {
                        log::info!("Loaded sound {} from '{}'", key.as_str(), sound.path.display());
                        sounds.insert(key, sound);
                    }
                    Err(AssetError::NotConfigured) => {}
                    Err(e) => log::warn!("Sound {} unavailable: {}", key.as_str(), e),
                }
            }
        }

        Self {
            backend,
            sounds,
            volume: settings.effective_volume(),
        }
    }

    /// A manager that never plays anything
    pub fn disabled() -> Self {
        Self {
            backend: None,
            sounds: HashMap::new(),
            volume: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn has_sound(&self, key: SoundKey) -> bool {
        self.sounds.contains_key(&key)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Play a sound effect; silently does nothing if it cannot be played
    pub fn play(&mut self, key: SoundKey) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let Some(sound) = self.sounds.get(&key) else {
            return;
        };
        backend.play(key, sound, self.volume);
    }

    /// Play the sounds for a batch of simulation events, in order
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for key in events.iter().filter_map(SoundKey::for_event) {
            self.play(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Records plays into a shared list the test can inspect
    struct SpyBackend(Rc<RefCell<Vec<SoundKey>>>);

    impl AudioBackend for SpyBackend {
        fn play(&mut self, key: SoundKey, _sound: &SoundData, _volume: f32) {
            self.0.borrow_mut().push(key);
        }
    }

    fn wav_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("neon_arena_{}_{}", std::process::id(), name));
        std::fs::write(&path, b"RIFF\x24\0\0\0WAVEfmt ").expect("write temp file");
        path
    }

    fn settings_with_shoot(path: PathBuf) -> Settings {
        let mut settings = Settings::default();
        settings.sounds = Default::default();
        settings.sounds.shoot = Some(path);
        settings.sounds.enemy_kill = Some(PathBuf::from("/no/such/kill.wav"));
        settings
    }

    #[test]
    fn test_plays_loaded_sounds_only() {
        let path = wav_file("shoot.wav");
        let played = Rc::new(RefCell::new(Vec::new()));
        let backend: Box<dyn AudioBackend> = Box::new(SpyBackend(played.clone()));
        let mut audio = AudioManager::new(Ok(backend), &settings_with_shoot(path.clone()));

        assert!(audio.is_enabled());
        assert!(audio.has_sound(SoundKey::Shoot));
        assert!(!audio.has_sound(SoundKey::EnemyKill));

        audio.play_events(&[GameEvent::Shot, GameEvent::EnemyKilled, GameEvent::Shot]);
        assert_eq!(*played.borrow(), vec![SoundKey::Shoot, SoundKey::Shoot]);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unavailable_audio_disables_everything() {
        let path = wav_file("shoot_disabled.wav");
        let mut audio = AudioManager::new(
            Err(AudioError::Unavailable("no device".to_string())),
            &settings_with_shoot(path.clone()),
        );
        assert!(!audio.is_enabled());
        assert!(!audio.has_sound(SoundKey::Shoot));
        // Must not panic
        audio.play(SoundKey::Shoot);
        AudioManager::disabled().play(SoundKey::RewindStart);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_muted_volume_is_silent() {
        let path = wav_file("shoot_muted.wav");
        let played = Rc::new(RefCell::new(Vec::new()));
        let backend: Box<dyn AudioBackend> = Box::new(SpyBackend(played.clone()));
        let mut audio = AudioManager::new(Ok(backend), &settings_with_shoot(path.clone()));
        audio.set_volume(0.0);
        audio.play(SoundKey::Shoot);
        assert!(played.borrow().is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundKey::for_event(&GameEvent::RewindStarted { frames: 3 }),
            Some(SoundKey::RewindStart)
        );
        assert_eq!(SoundKey::for_event(&GameEvent::PowerupCollected), Some(SoundKey::Powerup));
        assert_eq!(SoundKey::for_event(&GameEvent::RewindFinished), None);
    }
}
