use std::path::Path;

use crate::error::ConfigError;
use crate::scoring::ScoreConfig;
use crate::session::{SessionConfig, TimingConfig};
use crate::storage::StorageConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoreConfig,
    pub timing: TimingConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        let m = &s.difficulty_multipliers;
        for (tier, value) in [
            ("easy", m.easy),
            ("medium", m.medium),
            ("hard", m.hard),
            ("expert", m.expert),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "scoring.difficulty_multipliers.{tier} must be > 0"
                )));
            }
        }
        if s.two_star_factor > s.three_star_factor {
            return Err(ConfigError::Validation(
                "scoring.two_star_factor must be <= scoring.three_star_factor".into(),
            ));
        }
        if s.perfect_bonus_multiplier < 1.0 {
            return Err(ConfigError::Validation(
                "scoring.perfect_bonus_multiplier must be >= 1".into(),
            ));
        }
        if s.seconds_per_pair_baseline == 0 {
            return Err(ConfigError::Validation(
                "scoring.seconds_per_pair_baseline must be > 0".into(),
            ));
        }
        if s.perfect_moves_per_pair == 0 {
            return Err(ConfigError::Validation(
                "scoring.perfect_moves_per_pair must be > 0".into(),
            ));
        }
        if s.combo_multiplier_step < 0.0 || s.combo_bonus_cap < 0.0 {
            return Err(ConfigError::Validation(
                "scoring combo step and cap must be >= 0".into(),
            ));
        }

        if self.timing.mismatch_settle_ms < self.timing.reveal_settle_ms {
            return Err(ConfigError::Validation(
                "timing.mismatch_settle_ms must be >= timing.reveal_settle_ms".into(),
            ));
        }

        if self.session.max_players < 2 {
            return Err(ConfigError::Validation(
                "session.max_players must be >= 2".into(),
            ));
        }
        if self.session.max_name_len == 0 {
            return Err(ConfigError::Validation(
                "session.max_name_len must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
