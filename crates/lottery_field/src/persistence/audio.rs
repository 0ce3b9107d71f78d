//! Background music and sound effect volumes, each persisted under its own key.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::persistence::KeyValueStore;

pub const BGM_VOLUME_KEY: &str = "BgmVolume";
pub const SE_VOLUME_KEY: &str = "SeVolume";

/// A volume level in `[0, 1]`. Equality is approximate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct AudioVolume(f32);

impl AudioVolume {
    const EPSILON: f32 = 1e-4;

    pub const ZERO: AudioVolume = AudioVolume(0.0);
    pub const MAX: AudioVolume = AudioVolume(1.0);
    pub const DEFAULT: AudioVolume = AudioVolume(0.5);
    pub const DEFAULT_BGM: AudioVolume = AudioVolume(0.3);
    pub const DEFAULT_SE: AudioVolume = AudioVolume(0.6);

    /// Clamps into `[0, 1]`; NaN becomes silence.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_muted(self) -> bool {
        self.0 <= Self::EPSILON
    }
}

impl Default for AudioVolume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for AudioVolume {
    fn eq(&self, other: &Self) -> bool {
        (self.0 - other.0).abs() < Self::EPSILON
    }
}

impl From<f32> for AudioVolume {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<AudioVolume> for f32 {
    fn from(volume: AudioVolume) -> Self {
        volume.0
    }
}

impl fmt::Display for AudioVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AudioVolume({:.2})", self.0)
    }
}

/// Background music and sound effect volumes, persisted per key.
#[derive(Debug)]
pub struct AudioSettings<S> {
    store: S,
    bgm: AudioVolume,
    se: AudioVolume,
}

impl<S: KeyValueStore> AudioSettings<S> {
    /// Loads both volumes, falling back to defaults for missing or unreadable values.
    pub fn load(store: S) -> Self {
        let bgm = read_volume(&store, BGM_VOLUME_KEY, AudioVolume::DEFAULT_BGM);
        let se = read_volume(&store, SE_VOLUME_KEY, AudioVolume::DEFAULT_SE);
        debug!("Loaded audio settings: bgm {}, se {}.", bgm, se);
        Self { store, bgm, se }
    }

    pub fn bgm_volume(&self) -> AudioVolume {
        self.bgm
    }

    pub fn se_volume(&self) -> AudioVolume {
        self.se
    }

    /// Sets and persists the BGM volume. Unchanged values are not written.
    pub fn set_bgm_volume(&mut self, volume: impl Into<AudioVolume>) -> Result<()> {
        let volume = volume.into();
        if volume == self.bgm {
            return Ok(());
        }
        self.store.set(BGM_VOLUME_KEY, &volume.value().to_string())?;
        self.bgm = volume;
        Ok(())
    }

    /// Sets and persists the SE volume. Unchanged values are not written.
    pub fn set_se_volume(&mut self, volume: impl Into<AudioVolume>) -> Result<()> {
        let volume = volume.into();
        if volume == self.se {
            return Ok(());
        }
        self.store.set(SE_VOLUME_KEY, &volume.value().to_string())?;
        self.se = volume;
        Ok(())
    }

    /// Restores both defaults and drops the persisted values.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(BGM_VOLUME_KEY)?;
        self.store.remove(SE_VOLUME_KEY)?;
        self.bgm = AudioVolume::DEFAULT_BGM;
        self.se = AudioVolume::DEFAULT_SE;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn read_volume<S: KeyValueStore>(store: &S, key: &str, default: AudioVolume) -> AudioVolume {
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse::<f32>() {
            Ok(value) => AudioVolume::new(value),
            Err(_) => {
                warn!("Ignoring unreadable {} value '{}'.", key, raw);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to read {}: {}.", key, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn volume_is_clamped() {
        assert_eq!(AudioVolume::new(1.7), AudioVolume::MAX);
        assert_eq!(AudioVolume::new(-0.2), AudioVolume::ZERO);
        assert_eq!(AudioVolume::new(f32::NAN), AudioVolume::ZERO);
        assert!(AudioVolume::new(0.0).is_muted());
    }

    #[test]
    fn volume_equality_is_approximate() {
        assert_eq!(AudioVolume::new(0.3), AudioVolume::new(0.300_01));
        assert_ne!(AudioVolume::new(0.3), AudioVolume::new(0.31));
        assert_eq!(AudioVolume::DEFAULT_BGM.to_string(), "AudioVolume(0.30)");
    }

    #[test]
    fn missing_values_use_defaults() {
        let settings = AudioSettings::load(MemoryStore::new());
        assert_eq!(settings.bgm_volume(), AudioVolume::DEFAULT_BGM);
        assert_eq!(settings.se_volume(), AudioVolume::DEFAULT_SE);
    }

    #[test]
    fn volumes_persist_across_reload() {
        let mut settings = AudioSettings::load(MemoryStore::new());
        settings.set_bgm_volume(0.9).unwrap();
        settings.set_se_volume(2.0).unwrap();

        let settings = AudioSettings::load(settings.into_store());
        assert_eq!(settings.bgm_volume(), AudioVolume::new(0.9));
        assert_eq!(settings.se_volume(), AudioVolume::MAX);
    }

    #[test]
    fn unchanged_volume_is_not_written() {
        let mut settings = AudioSettings::load(MemoryStore::new());
        settings.set_bgm_volume(AudioVolume::DEFAULT_BGM).unwrap();
        assert!(!settings.store().contains_key(BGM_VOLUME_KEY));
    }

    #[test]
    fn unreadable_value_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set(SE_VOLUME_KEY, "loud").unwrap();
        store.set(BGM_VOLUME_KEY, " 0.25 ").unwrap();
        let settings = AudioSettings::load(store);
        assert_eq!(settings.se_volume(), AudioVolume::DEFAULT_SE);
        assert_eq!(settings.bgm_volume(), AudioVolume::new(0.25));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut settings = AudioSettings::load(MemoryStore::new());
        settings.set_bgm_volume(0.0).unwrap();
        settings.reset().unwrap();
        assert_eq!(settings.bgm_volume(), AudioVolume::DEFAULT_BGM);
        assert!(settings.store().is_empty());
    }
}
