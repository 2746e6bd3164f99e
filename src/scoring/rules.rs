use serde::{Deserialize, Serialize};

use crate::game::Difficulty;

/// Per-tier scalar applied to every scoring formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyMultipliers {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
    pub expert: f64,
}

impl Default for DifficultyMultipliers {
    fn default() -> Self {
        DifficultyMultipliers {
            easy: 1.0,
            medium: 1.5,
            hard: 2.0,
            expert: 3.0,
        }
    }
}

impl DifficultyMultipliers {
    pub fn get(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }
}

/// Scoring constants. These are tuning values, loadable from the
/// `[scoring]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub base_match_score: u64,
    /// Combo bonus gained per streak level
    pub combo_multiplier_step: f64,
    pub combo_bonus_cap: f64,
    pub seconds_per_pair_baseline: u64,
    pub time_bonus_scale: f64,
    pub time_bonus_base: u64,
    /// Moves per pair that count as a perfect round
    pub perfect_moves_per_pair: u32,
    pub perfect_bonus_multiplier: f64,
    pub combo_bonus_per_level: u64,
    pub three_star_factor: u64,
    pub two_star_factor: u64,
    pub difficulty_multipliers: DifficultyMultipliers,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            base_match_score: 100,
            combo_multiplier_step: 0.5,
            combo_bonus_cap: 2.0,
            seconds_per_pair_baseline: 10,
            time_bonus_scale: 5.0,
            time_bonus_base: 500,
            perfect_moves_per_pair: 2,
            perfect_bonus_multiplier: 1.5,
            combo_bonus_per_level: 50,
            three_star_factor: 250,
            two_star_factor: 150,
            difficulty_multipliers: DifficultyMultipliers::default(),
        }
    }
}

impl ScoreConfig {
    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        self.difficulty_multipliers.get(difficulty)
    }

    /// Combo bonus for a streak already counting the current match
    pub fn combo_bonus(&self, streak: u32) -> f64 {
        (f64::from(streak) * self.combo_multiplier_step).min(self.combo_bonus_cap)
    }

    /// Points for one match at the given streak
    pub fn match_score(&self, streak: u32, difficulty: Difficulty) -> u64 {
        let raw = self.base_match_score as f64
            * (1.0 + self.combo_bonus(streak))
            * self.multiplier(difficulty);
        round_points(raw)
    }
}

/// Round half away from zero, clamped at zero.
pub(crate) fn round_points(value: f64) -> u64 {
    let rounded = value.round();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_on_easy() {
        let config = ScoreConfig::default();
        assert_eq!(config.match_score(1, Difficulty::Easy), 150);
    }

    #[test]
    fn test_combo_bonus_is_capped() {
        let config = ScoreConfig::default();
        assert!((config.combo_bonus(2) - 1.0).abs() < 1e-12);
        assert!((config.combo_bonus(4) - 2.0).abs() < 1e-12);
        assert!((config.combo_bonus(9) - 2.0).abs() < 1e-12);
        assert_eq!(config.match_score(9, Difficulty::Easy), 300);
    }

    #[test]
    fn test_difficulty_multiplier_applies() {
        let config = ScoreConfig::default();
        assert_eq!(config.match_score(1, Difficulty::Medium), 225);
        assert_eq!(config.match_score(1, Difficulty::Expert), 450);
    }

    #[test]
    fn test_round_points_half_away_from_zero() {
        assert_eq!(round_points(2.5), 3);
        assert_eq!(round_points(2.4999), 2);
        assert_eq!(round_points(-3.5), 0);
        assert_eq!(round_points(f64::NAN), 0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ScoreConfig = toml::from_str(
            r#"
base_match_score = 120
[difficulty_multipliers]
expert = 4.0
"#,
        )
        .unwrap();
        assert_eq!(config.base_match_score, 120);
        assert!((config.multiplier(Difficulty::Expert) - 4.0).abs() < 1e-12);
        assert!((config.multiplier(Difficulty::Medium) - 1.5).abs() < 1e-12);
        assert_eq!(config.seconds_per_pair_baseline, 10);
    }
}
