use serde::{Deserialize, Serialize};

use super::rules::{round_points, ScoreConfig};
use crate::game::Difficulty;

/// Frozen round statistics fed to [`calculate_final_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScoreInput {
    pub running_score: u64,
    pub move_count: u32,
    pub elapsed_seconds: u64,
    pub max_combo_streak: u32,
    pub difficulty: Difficulty,
    pub total_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScoreBreakdown {
    pub running_score: u64,
    pub time_bonus: u64,
    pub efficiency_bonus: u64,
    pub perfect_bonus: u64,
    pub combo_bonus: u64,
    pub total: u64,
    pub is_perfect: bool,
    pub perfect_move_count: u32,
    pub move_count: u32,
    pub elapsed_seconds: u64,
    pub max_combo_streak: u32,
    pub stars: u8,
}

/// Reduce round statistics to the final score. Pure and deterministic: every
/// rounding is half away from zero on the final product.
pub fn calculate_final_score(config: &ScoreConfig, input: &FinalScoreInput) -> FinalScoreBreakdown {
    let multiplier = config.multiplier(input.difficulty);
    let total_pairs = input.total_pairs as u64;

    let expected_seconds = total_pairs * config.seconds_per_pair_baseline;
    let time_bonus = round_points(
        (expected_seconds as f64 - input.elapsed_seconds as f64)
            * config.time_bonus_scale
            * multiplier,
    );

    let perfect_move_count = (total_pairs * u64::from(config.perfect_moves_per_pair)) as u32;
    let efficiency_bonus = if input.move_count == 0 {
        0
    } else {
        round_points(
            config.time_bonus_base as f64
                * (f64::from(perfect_move_count) / f64::from(input.move_count))
                * multiplier,
        )
    };

    let is_perfect = input.move_count == perfect_move_count;
    let perfect_bonus = if is_perfect {
        round_points(input.running_score as f64 * (config.perfect_bonus_multiplier - 1.0))
    } else {
        0
    };

    let combo_bonus = round_points(
        f64::from(input.max_combo_streak) * config.combo_bonus_per_level as f64 * multiplier,
    );

    let total = input.running_score + time_bonus + efficiency_bonus + perfect_bonus + combo_bonus;

    FinalScoreBreakdown {
        running_score: input.running_score,
        time_bonus,
        efficiency_bonus,
        perfect_bonus,
        combo_bonus,
        total,
        is_perfect,
        perfect_move_count,
        move_count: input.move_count,
        elapsed_seconds: input.elapsed_seconds,
        max_combo_streak: input.max_combo_streak,
        stars: star_rating(config, total, input.total_pairs, input.difficulty),
    }
}

/// 1-3 stars against pair-count-scaled thresholds.
pub fn star_rating(config: &ScoreConfig, total: u64, total_pairs: usize, difficulty: Difficulty) -> u8 {
    let scale = total_pairs as f64 * config.multiplier(difficulty);
    let total = total as f64;
    if total >= scale * config.three_star_factor as f64 {
        3
    } else if total >= scale * config.two_star_factor as f64 {
        2
    } else {
        1
    }
}
