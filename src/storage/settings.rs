use serde::{Deserialize, Serialize};

use super::store::{load_json, save_json, KeyValueStore};
use crate::error::StoreError;

pub const SETTINGS_KEY: &str = "settings";

/// User preferences, persisted under [`SETTINGS_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: String,
    pub color_theme: String,
    pub sound_enabled: bool,
    /// 0-100
    pub volume: u8,
    pub keyboard_nav: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: "emoji".to_string(),
            color_theme: "default".to_string(),
            sound_enabled: true,
            volume: 70,
            keyboard_nav: true,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load settings, degrading to defaults if the store is unavailable or
    /// the record is unreadable. The error, if any, is returned alongside so
    /// the caller can surface a notice.
    pub fn load(store: &dyn KeyValueStore) -> (Settings, Option<StoreError>) {
        match load_json::<Settings>(store, SETTINGS_KEY) {
            Ok(Some(mut settings)) => {
                settings.volume = settings.volume.min(100);
                (settings, None)
            }
            Ok(None) => (Settings::default(), None),
            Err(e) => {
                tracing::warn!("failed to load settings, using defaults: {e}");
                (Settings::default(), Some(e))
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, SETTINGS_KEY, self).inspect_err(|e| {
            tracing::warn!("failed to save settings: {e}");
        })
    }

    /// Switch the symbol theme and persist the whole record.
    pub fn set_theme(
        &mut self,
        tag: &str,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), StoreError> {
        self.theme = tag.to_string();
        self.save(store)
    }

    /// Whether audible notifications should play
    pub fn audible(&self) -> bool {
        self.sound_enabled && self.volume > 0
    }
}
