//! Game settings and preferences
//!
//! Presentation-side knobs only: nothing here changes gameplay outcomes.
//! Persisted separately from the high score through a `KeyValueStore`.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

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

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 48,
            QualityPreset::Medium => 200,
            QualityPreset::High => 600,
        }
    }

    /// Trail points kept per ball
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 10,
            QualityPreset::High => 20,
        }
    }
}

/// Caps the simulation applies to cosmetic state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectLimits {
    pub max_particles: usize,
    pub trail_length: usize,
    pub screen_shake: bool,
}

impl Default for EffectLimits {
    fn default() -> Self {
        Settings::default().effect_limits()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on block destruction
    pub screen_shake: bool,
    /// Ball trails
    pub trails: bool,
    /// Block debris particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            trails: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "brick_rally_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops trails entirely
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            self.quality.trail_length()
        }
    }

    pub fn effect_limits(&self) -> EffectLimits {
        EffectLimits {
            max_particles: self.max_particles(),
            trail_length: self.trail_length(),
            screen_shake: self.effective_screen_shake(),
        }
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings storage unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effect_limits().screen_shake);
    }

    #[test]
    fn test_low_preset_drops_trails() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.trail_length(), 0);
        assert_eq!(settings.max_particles(), QualityPreset::Low.max_particles());
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.effect_limits().max_particles, 0);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::default();
        let settings = Settings::from_preset(QualityPreset::High);
        settings.save(&mut store).unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.quality, QualityPreset::High);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::default();
        store.set(Settings::STORAGE_KEY, r#"{"muted":true}"#).unwrap();
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert!(loaded.particles);
    }
}
