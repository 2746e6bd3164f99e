use std::time::Duration;

use super::breakdown::{calculate_final_score, FinalScoreBreakdown, FinalScoreInput};
use super::rules::ScoreConfig;
use super::timer::GameTimer;
use crate::game::Difficulty;

/// Running score counters for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub running_score: u64,
    pub move_count: u32,
    pub match_count: u32,
    pub combo_streak: u32,
    pub max_combo_streak: u32,
    /// Last whole second reported by the timer
    pub elapsed_seconds: u64,
    pub difficulty: Difficulty,
    pub paused: bool,
}

/// Points awarded for a single match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchAward {
    pub points: u64,
    /// Streak after counting this match
    pub streak: u32,
    pub combo_bonus: f64,
}

/// Receives score events. Every hook is optional.
pub trait ScoreObserver {
    fn on_move(&mut self, _state: &ScoreState) {}
    fn on_match(&mut self, _award: &MatchAward, _state: &ScoreState) {}
    fn on_miss(&mut self, _state: &ScoreState) {}
    fn on_time_tick(&mut self, _elapsed_seconds: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Tracks moves, matches, combos and elapsed time for one round, and reduces
/// them to a [`FinalScoreBreakdown`] when the round completes.
pub struct ScoreEngine {
    config: ScoreConfig,
    state: ScoreState,
    timer: GameTimer,
    observers: Vec<(SubscriptionId, Box<dyn ScoreObserver>)>,
    next_subscription: u64,
    final_breakdown: Option<FinalScoreBreakdown>,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig, difficulty: Difficulty) -> Self {
        ScoreEngine {
            config,
            state: ScoreState {
                running_score: 0,
                move_count: 0,
                match_count: 0,
                combo_streak: 0,
                max_combo_streak: 0,
                elapsed_seconds: 0,
                difficulty,
                paused: false,
            },
            timer: GameTimer::new(),
            observers: Vec::new(),
            next_subscription: 0,
            final_breakdown: None,
        }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Current counters. `elapsed_seconds` is the last ticked value; use
    /// [`ScoreEngine::elapsed_seconds`] for a fresh reading.
    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn is_frozen(&self) -> bool {
        self.final_breakdown.is_some()
    }

    pub fn final_breakdown(&self) -> Option<&FinalScoreBreakdown> {
        self.final_breakdown.as_ref()
    }

    pub fn subscribe(&mut self, observer: Box<dyn ScoreObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// One pair attempt (second card of a pair turned over).
    pub fn record_move(&mut self) {
        if self.is_frozen() {
            return;
        }
        self.state.move_count += 1;
        let state = self.state;
        for (_, obs) in &mut self.observers {
            obs.on_move(&state);
        }
    }

    pub fn record_match(&mut self) -> MatchAward {
        if self.is_frozen() {
            return MatchAward {
                points: 0,
                streak: self.state.combo_streak,
                combo_bonus: 0.0,
            };
        }
        self.state.match_count += 1;
        self.state.combo_streak += 1;
        self.state.max_combo_streak = self.state.max_combo_streak.max(self.state.combo_streak);

        let streak = self.state.combo_streak;
        let award = MatchAward {
            points: self.config.match_score(streak, self.state.difficulty),
            streak,
            combo_bonus: self.config.combo_bonus(streak),
        };
        self.state.running_score += award.points;

        let state = self.state;
        for (_, obs) in &mut self.observers {
            obs.on_match(&award, &state);
        }
        award
    }

    /// A miss breaks the combo and scores nothing.
    pub fn record_miss(&mut self) {
        if self.is_frozen() {
            return;
        }
        self.state.combo_streak = 0;
        let state = self.state;
        for (_, obs) in &mut self.observers {
            obs.on_miss(&state);
        }
    }

    pub fn start_timer(&mut self, now: Duration) -> bool {
        self.timer.start(now)
    }

    pub fn pause(&mut self, now: Duration) -> bool {
        let paused = self.timer.pause(now);
        if paused {
            self.state.paused = true;
            self.state.elapsed_seconds = self.timer.elapsed_seconds(now);
        }
        paused
    }

    pub fn resume(&mut self, now: Duration) -> bool {
        let resumed = self.timer.resume(now);
        if resumed {
            self.state.paused = false;
        }
        resumed
    }

    /// Advance the clock. Notifies observers when a new second elapses.
    pub fn tick(&mut self, now: Duration) -> Option<u64> {
        let secs = self.timer.tick(now)?;
        self.state.elapsed_seconds = secs;
        for (_, obs) in &mut self.observers {
            obs.on_time_tick(secs);
        }
        Some(secs)
    }

    pub fn elapsed_seconds(&self, now: Duration) -> u64 {
        self.timer.elapsed_seconds(now)
    }

    /// Counters with a fresh elapsed-time reading
    pub fn snapshot(&self, now: Duration) -> ScoreState {
        ScoreState {
            elapsed_seconds: self.elapsed_seconds(now),
            ..self.state
        }
    }

    /// Stop the timer and compute the final breakdown. Later calls return the
    /// breakdown computed the first time.
    pub fn finalize(&mut self, total_pairs: usize, now: Duration) -> FinalScoreBreakdown {
        if let Some(done) = &self.final_breakdown {
            return done.clone();
        }
        self.timer.stop(now);
        self.state.paused = false;
        self.state.elapsed_seconds = self.timer.elapsed_seconds(now);

        let breakdown = calculate_final_score(
            &self.config,
            &FinalScoreInput {
                running_score: self.state.running_score,
                move_count: self.state.move_count,
                elapsed_seconds: self.state.elapsed_seconds,
                max_combo_streak: self.state.max_combo_streak,
                difficulty: self.state.difficulty,
                total_pairs,
            },
        );
        self.final_breakdown = Some(breakdown.clone());
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    struct LogObserver(Rc<RefCell<Log>>);

    impl ScoreObserver for LogObserver {
        fn on_move(&mut self, state: &ScoreState) {
            self.0.borrow_mut().events.push(format!("move {}", state.move_count));
        }
        fn on_match(&mut self, award: &MatchAward, _state: &ScoreState) {
            self.0.borrow_mut().events.push(format!("match {}", award.points));
        }
        fn on_miss(&mut self, _state: &ScoreState) {
            self.0.borrow_mut().events.push("miss".to_string());
        }
        fn on_time_tick(&mut self, secs: u64) {
            self.0.borrow_mut().events.push(format!("tick {secs}"));
        }
    }

    fn engine() -> ScoreEngine {
        ScoreEngine::new(ScoreConfig::default(), Difficulty::Easy)
    }

    #[test]
    fn test_first_match_scores_150() {
        let mut e = engine();
        e.record_move();
        let award = e.record_match();
        assert_eq!(award.points, 150);
        assert_eq!(e.state().combo_streak, 1);
        assert_eq!(e.state().running_score, 150);
        assert_eq!(e.state().match_count, 1);
    }

    #[test]
    fn test_combo_grows_and_caps() {
        let mut e = engine();
        let points: Vec<u64> = (0..6).map(|_| e.record_match().points).collect();
        assert_eq!(points, vec![150, 200, 250, 300, 300, 300]);
        assert_eq!(e.state().max_combo_streak, 6);
    }

    #[test]
    fn test_miss_resets_combo_keeps_score() {
        let mut e = engine();
        e.record_match();
        e.record_match();
        e.record_match();
        let score = e.state().running_score;
        e.record_miss();
        assert_eq!(e.state().combo_streak, 0);
        assert_eq!(e.state().max_combo_streak, 3);
        assert_eq!(e.state().running_score, score);

        assert_eq!(e.record_match().points, 150);
    }

    #[test]
    fn test_observers_receive_events() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut e = engine();
        e.subscribe(Box::new(LogObserver(log.clone())));
        e.start_timer(Duration::ZERO);

        e.record_move();
        e.record_match();
        e.record_move();
        e.record_miss();
        e.tick(Duration::from_secs(1));

        assert_eq!(
            log.borrow().events,
            vec!["move 1", "match 150", "move 2", "miss", "tick 1"]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut e = engine();
        let id = e.subscribe(Box::new(LogObserver(log.clone())));
        assert!(e.unsubscribe(id));
        assert!(!e.unsubscribe(id));
        e.record_move();
        assert!(log.borrow().events.is_empty());
    }

    #[test]
    fn test_pause_marks_state() {
        let mut e = engine();
        e.start_timer(Duration::ZERO);
        assert!(e.pause(Duration::from_secs(5)));
        assert!(e.state().paused);
        assert_eq!(e.tick(Duration::from_secs(9)), None);
        assert!(e.resume(Duration::from_secs(9)));
        assert!(!e.state().paused);
        assert_eq!(e.snapshot(Duration::from_secs(10)).elapsed_seconds, 6);
    }

    #[test]
    fn test_finalize_freezes() {
        let mut e = engine();
        e.start_timer(Duration::ZERO);
        for _ in 0..6 {
            e.record_move();
            e.record_move();
            e.record_match();
        }
        let breakdown = e.finalize(6, Duration::from_secs(40));
        assert!(breakdown.is_perfect);
        assert!(breakdown.perfect_bonus > 0);
        assert_eq!(breakdown.elapsed_seconds, 40);

        // frozen: further events change nothing
        e.record_move();
        e.record_match();
        assert_eq!(e.state().move_count, 12);
        assert_eq!(e.finalize(6, Duration::from_secs(99)), breakdown);
        assert_eq!(e.elapsed_seconds(Duration::from_secs(99)), 40);
    }
}
