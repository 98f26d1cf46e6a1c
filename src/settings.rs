//! Game settings and preferences
//!
//! Persisted as JSON, separately from the high score.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_PARTICLES, STAR_COUNT};
use crate::persistence::{Result, Storage};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Next preset in the quality hotkey cycle
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 800,
            QualityPreset::High => DEFAULT_MAX_PARTICLES,
        }
    }

    /// Background star count for this preset
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => STAR_COUNT / 4,
            QualityPreset::Medium => STAR_COUNT / 2,
            QualityPreset::High => STAR_COUNT,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Explosion and impact particles
    pub particles: bool,
    /// Twinkling starfield
    pub starfield: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no invulnerability flicker)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,
            starfield: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "spaceGameSettings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        // Low preset drops the starfield entirely
        self.starfield = preset != QualityPreset::Low;
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        if !self.starfield {
            0
        } else {
            self.quality.star_count()
        }
    }

    /// Load settings, `None` when nothing is stored
    pub fn load(storage: &dyn Storage) -> Result<Option<Self>> {
        let Some(json) = storage.get(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from storage");
        Ok(Some(settings))
    }

    /// Load, logging and falling back to defaults on failure
    pub fn load_or_default(storage: &dyn Storage) -> Self {
        match Self::load(storage) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        let json = serde_json::to_string(self)?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, PersistenceError};

    #[test]
    fn test_preset_cycle() {
        let mut preset = QualityPreset::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            preset = preset.next();
            seen.push(preset);
        }
        assert_eq!(
            seen,
            vec![QualityPreset::Low, QualityPreset::Medium, QualityPreset::High]
        );
    }

    #[test]
    fn test_effective_limits() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), DEFAULT_MAX_PARTICLES);
        assert_eq!(settings.star_count(), STAR_COUNT);

        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);

        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.starfield);
        assert_eq!(settings.star_count(), 0);

        settings.apply_preset(QualityPreset::Medium);
        assert!(settings.starfield);
        assert_eq!(settings.star_count(), STAR_COUNT / 2);
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage).unwrap(), None);

        let mut settings = Settings::from_preset(QualityPreset::Medium);
        settings.reduced_motion = true;
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage).unwrap(), Some(settings));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#)
            .unwrap();
        let settings = Settings::load_or_default(&storage);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set(Settings::STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(
            Settings::load(&storage),
            Err(PersistenceError::Json(_))
        ));
        assert_eq!(Settings::load_or_default(&storage), Settings::default());
    }
}
