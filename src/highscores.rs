//! Best score across sessions
//!
//! A single integer persisted under `spaceGameHighScore`.

use crate::persistence::{PersistenceError, Result, Storage};

/// Persisted high score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore(pub u64);

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "spaceGameHighScore";

    /// Read the stored value; a missing key is a high score of zero
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let Some(raw) = storage.get(Self::STORAGE_KEY)? else {
            log::info!("No high score found, starting fresh");
            return Ok(Self::default());
        };
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| PersistenceError::Corrupt {
                key: Self::STORAGE_KEY.to_string(),
                value: raw.clone(),
            })?;
        log::info!("Loaded high score {}", value);
        Ok(Self(value))
    }

    /// Load, logging and falling back to zero on failure
    pub fn load_or_default(storage: &dyn Storage) -> Self {
        Self::load(storage).unwrap_or_else(|e| {
            log::warn!("Could not load high score: {}", e);
            Self::default()
        })
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        storage.set(Self::STORAGE_KEY, &self.0.to_string())?;
        log::info!("High score saved ({})", self.0);
        Ok(())
    }

    /// Raise the high score if `score` beats it; returns true when raised
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.0 {
            self.0 = score;
            true
        } else {
            false
        }
    }
}
