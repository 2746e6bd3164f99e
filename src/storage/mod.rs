//! Persistence boundary: key-value stores, user settings and the leaderboard.

mod leaderboard;
mod settings;
mod store;

use std::path::PathBuf;

pub use leaderboard::{
    Leaderboard, LeaderboardEntry, Rank, ScoreSubmission, LEADERBOARD_CAPACITY, LEADERBOARD_KEY,
};
pub use settings::{Settings, SETTINGS_KEY};
pub use store::{load_json, save_json, FileStore, KeyValueStore, MemoryStore, UnavailableStore};

/// Where persistent data lives.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: PathBuf::from(".memory-match"),
        }
    }
}

/// Open a file store in the configured directory, falling back to an
/// in-memory store when the directory cannot be used.
pub fn open_store(config: &StorageConfig) -> (Box<dyn KeyValueStore>, Option<crate::error::StoreError>) {
    match FileStore::open(&config.data_dir) {
        Ok(store) => (Box::new(store), None),
        Err(e) => {
            tracing::warn!("persistent storage unavailable, using memory: {e}");
            (Box::new(MemoryStore::new()), Some(e))
        }
    }
}
