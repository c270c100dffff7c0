//! Best-score record
//!
//! Persisted as a single JSON object under one storage key.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
    /// Stage the best run reached
    #[serde(default)]
    pub stage: u32,
}

impl HighScore {
    pub const STORAGE_KEY: &'static str = "brick_rally_highscore";

    /// Record a finished (or running) result; returns true on a new best
    pub fn submit(&mut self, score: u64, stage: u32) -> bool {
        if score == 0 || score <= self.score {
            return false;
        }
        self.score = score;
        self.stage = stage;
        true
    }

    /// Load the record, starting fresh when absent or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScore>(&json) {
                Ok(best) => {
                    log::info!("Loaded high score {} (stage {})", best.score, best.stage);
                    best
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable high score: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score storage unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High score saved ({})", self.score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_submit_only_accepts_improvements() {
        let mut best = HighScore::default();
        assert!(!best.submit(0, 1));
        assert!(best.submit(120, 2));
        assert!(!best.submit(120, 3));
        assert!(!best.submit(80, 4));
        assert_eq!(best, HighScore { score: 120, stage: 2 });
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::default();
        assert_eq!(HighScore::load(&store), HighScore::default());

        let best = HighScore { score: 640, stage: 3 };
        best.save(&mut store).unwrap();
        assert_eq!(HighScore::load(&store), best);
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let mut store = MemoryStore::default();
        store.set(HighScore::STORAGE_KEY, "not json").unwrap();
        assert_eq!(HighScore::load(&store), HighScore::default());
    }

    #[test]
    fn test_legacy_record_without_stage() {
        let mut store = MemoryStore::default();
        store.set(HighScore::STORAGE_KEY, r#"{"score":90}"#).unwrap();
        assert_eq!(HighScore::load(&store).score, 90);
    }
}
