//! Driver settings and preferences
//!
//! Persisted in LocalStorage on the web, JSON files on native.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_DIRECTION, PARTICLE_FILL};
use crate::error::LoadError;
use crate::surface::Rgba;

/// Frame driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Particle fill colour
    pub fill_color: Rgba,
    /// Direction value handed to the motion step each frame (has no effect on motion)
    pub direction: f32,
    /// Frames to run before stopping (headless native runs only)
    pub max_frames: u64,
    /// Log every published batch at `debug` level
    pub log_updates: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            fill_color: PARTICLE_FILL,
            direction: FRAME_DIRECTION,
            max_frames: 120,
            log_updates: false,
        }
    }
}

impl DriverSettings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "dodging_particles_settings";

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DriverSettings::default();
        assert_eq!(settings.direction, 10.0);
        assert_eq!(settings.fill_color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = DriverSettings::from_json(r#"{"max_frames": 3}"#).unwrap();
        assert_eq!(settings.max_frames, 3);
        assert_eq!(settings.direction, FRAME_DIRECTION);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            DriverSettings::from_json("{not json"),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DriverSettings::load_from("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("dodging_particles_settings_test.json");
        let settings = DriverSettings {
            max_frames: 9,
            log_updates: true,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(DriverSettings::load_from(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);
    }
}
