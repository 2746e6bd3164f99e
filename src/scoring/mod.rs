//! Score engine: running score with combo bonuses, the round timer, and the
//! final score breakdown with star rating.

mod breakdown;
mod engine;
mod rules;
mod timer;

pub use breakdown::{calculate_final_score, star_rating, FinalScoreBreakdown, FinalScoreInput};
pub use engine::{MatchAward, ScoreEngine, ScoreObserver, ScoreState, SubscriptionId};
pub use rules::{DifficultyMultipliers, ScoreConfig};
pub use timer::{GameTimer, TimerState};
