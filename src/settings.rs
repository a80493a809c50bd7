//! Pond settings and preferences
//!
//! Persisted as JSON in LocalStorage on the web. Native builds start from
//! defaults and may read an override file.

use serde::{Deserialize, Serialize};

use crate::consts::FISH_COUNT;

/// Upper bound on the fish count a settings file may request
pub const MAX_FISH: usize = 64;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Curve subdivision cap for the painter
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 64,
        }
    }

    /// Whether to paint the drifting background blooms
    pub fn ambient_blooms(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Pond settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Koi in the pond
    pub fish_count: usize,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Countdown start value in seconds
    pub countdown_secs: u32,

    /// Reduced motion (freezes the ambient drift)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            fish_count: FISH_COUNT,
            seed: None,
            music_volume: 0.7,
            countdown_secs: 60,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values into their usable ranges
    pub fn sanitized(mut self) -> Self {
        self.fish_count = self.fish_count.min(MAX_FISH);
        self.music_volume = if self.music_volume.is_finite() {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            Self::default().music_volume
        };
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "koi_pond_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Write the (clamped) settings back so the stored copy is complete
    /// and editable (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            return;
        };
        match self.to_json() {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Settings not saved: storage refused the write");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }

    /// Load settings from an optional JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.quality, QualityPreset::Medium);
        assert_eq!(s.fish_count, 8);
        assert_eq!(s.countdown_secs, 60);
        assert!(s.seed.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "quality": "Low", "seed": 42 }"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.fish_count, FISH_COUNT);
    }

    #[test]
    fn test_json_is_clamped() {
        let s = Settings::from_json(r#"{ "fish_count": 5000, "music_volume": 3.0 }"#).unwrap();
        assert_eq!(s.fish_count, MAX_FISH);
        assert_eq!(s.music_volume, 1.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ quality: ").is_err());
    }

    #[test]
    fn test_stored_copy_reloads_clamped() {
        // What `save` writes after `load` clamped an out-of-range file
        let json = r#"{ "quality": "High", "fish_count": 900, "reduced_motion": true }"#;
        let loaded = Settings::from_json(json).unwrap();
        let stored = loaded.to_json().unwrap();
        assert!(stored.contains("\"countdown_secs\""));
        let back = Settings::from_json(&stored).unwrap();
        assert_eq!(back, loaded);
        assert_eq!(back.fish_count, MAX_FISH);
        assert_eq!(back.quality, QualityPreset::High);
    }

    #[test]
    fn test_preset_knobs() {
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert!(!QualityPreset::Low.ambient_blooms());
        assert!(QualityPreset::Low.circle_segments() < QualityPreset::High.circle_segments());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_from(Some(std::path::Path::new("/nonexistent/koi.json")));
        assert_eq!(s, Settings::default());
        assert_eq!(Settings::load_from(None), Settings::default());
    }
}
