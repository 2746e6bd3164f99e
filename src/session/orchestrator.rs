use std::time::Duration;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::clock::Clock;
use super::notify::{Notification, NotificationSink};
use super::scheduler::{ScheduledTask, Scheduler, TaskKind, TimingConfig};
use crate::config::AppConfig;
use crate::error::{DeckError, SessionError};
use crate::game::{
    build_deck, sanitize_name, winners, Board, Deck, Difficulty, Outcome, PairId, Player,
    Progress, Resolution,
};
use crate::scoring::{
    FinalScoreBreakdown, MatchAward, ScoreConfig, ScoreEngine, ScoreObserver, ScoreState,
    SubscriptionId,
};
use crate::storage::{Leaderboard, LeaderboardEntry, ScoreSubmission};
use crate::symbols::SymbolSource;

/// Player and notification limits, from the `[session]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_players: usize,
    pub max_name_len: usize,
    /// Streak length from which a combo notification fires
    pub combo_notify_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_players: 4,
            max_name_len: 20,
            combo_notify_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    SinglePlayer,
    Multiplayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// End-of-round summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub breakdown: FinalScoreBreakdown,
    /// Single player only: the total would make the leaderboard
    pub leaderboard_eligible: bool,
    /// Multiplayer only: indices of the winning player(s)
    pub winners: Vec<usize>,
}

/// What happened during [`Session::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Matched {
        pair_id: PairId,
        award: MatchAward,
        /// Multiplayer: player credited with the match
        player: Option<usize>,
    },
    /// The revealed pair did not match; it turns back after the settle delay
    Mismatched,
    /// A mismatched pair is face down again
    Reverted,
    TurnChanged(usize),
    Tick(u64),
    GameOver(GameOver),
}

/// Collaborators handed to the session at startup.
pub struct Services {
    pub clock: Box<dyn Clock>,
    pub sink: Box<dyn NotificationSink>,
    pub symbols: Box<dyn SymbolSource>,
    pub leaderboard: Leaderboard,
    pub rng: StdRng,
}

/// Read-only snapshot for renderers.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub mode: GameMode,
    pub state: GameState,
    pub difficulty: Difficulty,
    pub progress: Option<Progress>,
    pub score: Option<ScoreState>,
    pub players: &'a [Player],
    pub current_turn: Option<usize>,
    pub game_over: Option<&'a GameOver>,
}

struct Round {
    id: u64,
    board: Board,
    score: ScoreEngine,
}

/// Sequences turns, routes selections to the board and outcomes to the score
/// engine, and decides when the game is over.
///
/// Everything runs on the caller's thread. Delays between revealing a pair
/// and resolving it are scheduled tasks fired from [`Session::poll`]; each
/// task carries the id of the round that scheduled it and is discarded if
/// that round has since been replaced.
pub struct Session {
    score_config: ScoreConfig,
    timing: TimingConfig,
    config: SessionConfig,
    services: Services,

    mode: GameMode,
    state: GameState,
    difficulty: Difficulty,
    players: Vec<Player>,
    current_turn: usize,

    round: Option<Round>,
    next_round_id: u64,
    scheduler: Scheduler,
    game_over: Option<GameOver>,
    submitted: bool,
    deck_shortfall: Option<DeckError>,
}

impl Session {
    pub fn new(config: &AppConfig, services: Services) -> Self {
        Session {
            score_config: config.scoring.clone(),
            timing: config.timing.clone(),
            config: config.session.clone(),
            services,
            mode: GameMode::SinglePlayer,
            state: GameState::Idle,
            difficulty: Difficulty::default(),
            players: Vec::new(),
            current_turn: 0,
            round: None,
            next_round_id: 1,
            scheduler: Scheduler::new(),
            game_over: None,
            submitted: false,
            deck_shortfall: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(|r| &r.board)
    }

    /// Score counters with a fresh elapsed-time reading
    pub fn score(&self) -> Option<ScoreState> {
        let now = self.services.clock.now();
        self.round.as_ref().map(|r| r.score.snapshot(now))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Multiplayer only
    pub fn current_player(&self) -> Option<&Player> {
        match self.mode {
            GameMode::Multiplayer => self.players.get(self.current_turn),
            GameMode::SinglePlayer => None,
        }
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    /// Set when the symbol source could not supply every requested pair
    pub fn deck_shortfall(&self) -> Option<&DeckError> {
        self.deck_shortfall.as_ref()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.services.leaderboard
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            mode: self.mode,
            state: self.state,
            difficulty: self.difficulty,
            progress: self.board().map(Board::progress),
            score: self.score(),
            players: &self.players,
            current_turn: self.current_player().map(Player::index),
            game_over: self.game_over.as_ref(),
        }
    }

    /// Attach a score observer to the current round's engine. Observers do
    /// not carry over to later rounds.
    pub fn subscribe_score(&mut self, observer: Box<dyn ScoreObserver>) -> Option<SubscriptionId> {
        self.round.as_mut().map(|r| r.score.subscribe(observer))
    }

    pub fn start_single(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        let deck = self.deal(difficulty)?;
        self.mode = GameMode::SinglePlayer;
        self.difficulty = difficulty;
        self.players.clear();
        self.begin_round(deck);
        Ok(())
    }

    pub fn start_multiplayer<S: AsRef<str>>(
        &mut self,
        difficulty: Difficulty,
        names: &[S],
    ) -> Result<(), SessionError> {
        if names.len() < 2 || names.len() > self.config.max_players {
            return Err(SessionError::InvalidPlayerCount {
                got: names.len(),
                max: self.config.max_players,
            });
        }
        let deck = self.deal(difficulty)?;
        self.mode = GameMode::Multiplayer;
        self.difficulty = difficulty;
        self.players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i, name.as_ref(), self.config.max_name_len))
            .collect();
        self.begin_round(deck);
        Ok(())
    }

    /// New board and score engine from the stored difficulty and players.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let deck = self.deal(self.difficulty)?;
        self.begin_round(deck);
        Ok(())
    }

    /// Abandon the round without scoring.
    pub fn quit(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        if let Some(round) = self.round.take() {
            tracing::info!(round = round.id, cancelled, "round abandoned");
        }
        self.state = GameState::Idle;
        self.game_over = None;
        self.submitted = false;
    }

    /// Freeze the timer and block selection. No-op unless playing.
    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let now = self.services.clock.now();
        if let Some(round) = self.round.as_mut() {
            round.score.pause(now);
            round.board.disable_all();
        }
        self.state = GameState::Paused;
        true
    }

    /// Exact inverse of [`Session::pause`]. No-op unless paused.
    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        let now = self.services.clock.now();
        if let Some(round) = self.round.as_mut() {
            round.score.resume(now);
            round.board.enable_all();
        }
        self.state = GameState::Playing;
        true
    }

    /// Route a card selection to the board.
    pub fn select(&mut self, position: usize) -> Outcome {
        if self.state != GameState::Playing {
            return Outcome::Ignored;
        }
        let now = self.services.clock.now();
        let Some(round) = self.round.as_mut() else {
            return Outcome::Ignored;
        };

        let outcome = round.board.select(position);
        match outcome {
            Outcome::Ignored => {}
            Outcome::Flipped => self.services.sink.notify(Notification::Flip),
            Outcome::PairRevealed => {
                self.services.sink.notify(Notification::Flip);
                round.score.record_move();
                self.scheduler
                    .schedule(round.id, TaskKind::Adjudicate, now + self.timing.reveal_settle());
            }
        }
        outcome
    }

    /// Fire due delayed steps and the timer tick. Does nothing unless playing,
    /// so pending steps wait out a pause.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }
        let now = self.services.clock.now();

        while let Some(task) = self.scheduler.pop_due(now) {
            self.run_task(task, now, &mut events);
            if self.state != GameState::Playing {
                return events;
            }
        }

        if let Some(secs) = self.round.as_mut().and_then(|r| r.score.tick(now)) {
            events.push(SessionEvent::Tick(secs));
        }
        events
    }

    /// Record the finished single-player round on the leaderboard. A store
    /// failure is reported in the submission; round state is untouched.
    pub fn submit_score(&mut self, name: &str) -> Result<ScoreSubmission, SessionError> {
        if self.mode != GameMode::SinglePlayer {
            return Err(SessionError::NotSinglePlayer);
        }
        let Some(game_over) = self.game_over.as_ref() else {
            return Err(SessionError::NotFinished);
        };
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let b = &game_over.breakdown;
        let entry = LeaderboardEntry::new(
            sanitize_name(name, self.config.max_name_len),
            b.total,
            b.elapsed_seconds,
            b.move_count,
            OffsetDateTime::now_utc(),
        );
        let submission = self.services.leaderboard.save_score(self.difficulty, entry);
        self.submitted = true;
        Ok(submission)
    }

    /// Build the next deck. Nothing about the current round changes here, so
    /// a failure leaves it playable.
    fn deal(&mut self, difficulty: Difficulty) -> Result<Deck, DeckError> {
        build_deck(
            difficulty.pairs(),
            &*self.services.symbols,
            &mut self.services.rng,
        )
    }

    fn begin_round(&mut self, deck: Deck) {
        // anything still pending belongs to the round being replaced
        self.scheduler.cancel_all();
        self.deck_shortfall = deck.shortfall.clone();

        let id = self.next_round_id;
        self.next_round_id += 1;

        let mut score = ScoreEngine::new(self.score_config.clone(), self.difficulty);
        score.start_timer(self.services.clock.now());
        let board = Board::from_deck(deck);

        tracing::info!(
            round = id,
            difficulty = %self.difficulty,
            pairs = board.progress().total_pairs,
            players = self.players.len(),
            "round started"
        );

        self.round = Some(Round { id, board, score });
        for player in &mut self.players {
            player.reset();
        }
        self.current_turn = 0;
        self.state = GameState::Playing;
        self.game_over = None;
        self.submitted = false;
    }

    fn run_task(&mut self, task: ScheduledTask, now: Duration, events: &mut Vec<SessionEvent>) {
        let Some(round) = self.round.as_mut().filter(|r| r.id == task.round) else {
            tracing::debug!(round = task.round, kind = ?task.kind, "discarding stale task");
            return;
        };

        match task.kind {
            TaskKind::Adjudicate => match round.board.resolve() {
                Some(Resolution::Match { pair_id }) => self.apply_match(pair_id, events),
                Some(Resolution::Complete { pair_id }) => {
                    // the final pair scores like any other match first
                    self.apply_match(pair_id, events);
                    self.finish_round(now, events);
                }
                Some(Resolution::NoMatch) => {
                    round.score.record_miss();
                    self.scheduler.schedule(
                        round.id,
                        TaskKind::RevertMismatch,
                        now + self.timing.mismatch_settle(),
                    );
                    self.services.sink.notify(Notification::NoMatch);
                    events.push(SessionEvent::Mismatched);
                }
                None => tracing::debug!(round = round.id, "nothing to adjudicate"),
            },
            TaskKind::RevertMismatch => {
                if round.board.settle_mismatch() {
                    events.push(SessionEvent::Reverted);
                    self.advance_turn(events);
                }
            }
        }
    }

    fn apply_match(&mut self, pair_id: PairId, events: &mut Vec<SessionEvent>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let award = round.score.record_match();
        self.services.sink.notify(Notification::Match);
        if award.streak >= self.config.combo_notify_threshold {
            self.services.sink.notify(Notification::Combo(award.streak));
        }

        // same player keeps the turn
        let player = match self.mode {
            GameMode::Multiplayer => self.players.get_mut(self.current_turn).map(|p| {
                p.credit_match(award.points);
                p.index()
            }),
            GameMode::SinglePlayer => None,
        };
        events.push(SessionEvent::Matched {
            pair_id,
            award,
            player,
        });
    }

    fn advance_turn(&mut self, events: &mut Vec<SessionEvent>) {
        if self.mode != GameMode::Multiplayer || self.players.is_empty() {
            return;
        }
        self.current_turn = (self.current_turn + 1) % self.players.len();
        self.services
            .sink
            .notify(Notification::TurnChange(self.current_turn));
        events.push(SessionEvent::TurnChanged(self.current_turn));
    }

    fn finish_round(&mut self, now: Duration, events: &mut Vec<SessionEvent>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let total_pairs = round.board.progress().total_pairs;
        let breakdown = round.score.finalize(total_pairs, now);
        round.board.disable_all();
        self.scheduler.cancel_all();

        let leaderboard_eligible = self.mode == GameMode::SinglePlayer
            && self.services.leaderboard.is_eligible(
                self.difficulty,
                breakdown.total,
                breakdown.elapsed_seconds,
            );
        let winners = match self.mode {
            GameMode::Multiplayer => winners(&self.players),
            GameMode::SinglePlayer => Vec::new(),
        };

        tracing::info!(
            round = round.id,
            total = breakdown.total,
            stars = breakdown.stars,
            moves = breakdown.move_count,
            seconds = breakdown.elapsed_seconds,
            "round complete"
        );

        let game_over = GameOver {
            breakdown,
            leaderboard_eligible,
            winners,
        };
        self.state = GameState::Finished;
        self.game_over = Some(game_over.clone());
        self.services.sink.notify(Notification::Victory);
        events.push(SessionEvent::GameOver(game_over));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::game::FaceState;
    use crate::session::clock::ManualClock;
    use crate::session::notify::RecordingSink;
    use crate::storage::{MemoryStore, Rank, UnavailableStore};
    use crate::symbols::FixedSymbols;
    use rand::SeedableRng;

    struct Harness {
        session: Session,
        clock: ManualClock,
        sink: RecordingSink,
    }

    fn harness_with(leaderboard: Leaderboard, symbols: usize) -> Harness {
        let clock = ManualClock::new();
        let sink = RecordingSink::new();
        let services = Services {
            clock: Box::new(clock.clone()),
            sink: Box::new(sink.clone()),
            symbols: Box::new(FixedSymbols::numbered(symbols)),
            leaderboard,
            rng: StdRng::seed_from_u64(42),
        };
        Harness {
            session: Session::new(&AppConfig::default(), services),
            clock,
            sink,
        }
    }

    fn harness() -> Harness {
        harness_with(Leaderboard::load(Box::new(MemoryStore::new())).0, 24)
    }

    impl Harness {
        /// Board positions of the two cards of `pair_id`
        fn pair(&self, pair_id: PairId) -> (usize, usize) {
            let cards = self.session.board().unwrap().cards();
            let mut positions = cards
                .iter()
                .enumerate()
                .filter(|(_, c)| c.pair_id() == pair_id)
                .map(|(i, _)| i);
            (positions.next().unwrap(), positions.next().unwrap())
        }

        /// Poll, dropping clock ticks
        fn poll(&mut self) -> Vec<SessionEvent> {
            self.session
                .poll()
                .into_iter()
                .filter(|e| !matches!(e, SessionEvent::Tick(_)))
                .collect()
        }

        fn settle(&mut self) -> Vec<SessionEvent> {
            let mut events = Vec::new();
            // reveal settle, then mismatch settle
            self.clock.advance_millis(500);
            events.extend(self.poll());
            self.clock.advance_millis(1000);
            events.extend(self.poll());
            events
        }

        fn play(&mut self, a: usize, b: usize) -> Vec<SessionEvent> {
            self.session.select(a);
            self.session.select(b);
            self.settle()
        }

        fn play_match(&mut self, pair_id: PairId) -> Vec<SessionEvent> {
            let (a, b) = self.pair(pair_id);
            self.play(a, b)
        }

        fn play_miss(&mut self, p: PairId, q: PairId) -> Vec<SessionEvent> {
            let (a, _) = self.pair(p);
            let (b, _) = self.pair(q);
            self.play(a, b)
        }
    }

    #[test]
    fn test_idle_session_ignores_input() {
        let mut h = harness();
        assert_eq!(h.session.state(), GameState::Idle);
        assert_eq!(h.session.select(0), Outcome::Ignored);
        assert!(h.session.poll().is_empty());
        assert!(!h.session.pause());
    }

    #[test]
    fn test_first_match_on_easy() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let (a, b) = h.pair(0);

        assert_eq!(h.session.select(a), Outcome::Flipped);
        assert_eq!(h.session.select(b), Outcome::PairRevealed);
        assert_eq!(h.session.score().unwrap().move_count, 1);
        assert_eq!(h.session.pending_tasks(), 1);

        h.clock.advance_millis(499);
        assert!(h.session.poll().is_empty());
        h.clock.advance_millis(1);
        let events = h.session.poll();
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Matched { pair_id: 0, player: None, .. }]
        ));

        let score = h.session.score().unwrap();
        assert_eq!(score.combo_streak, 1);
        assert_eq!(score.running_score, 150);
        assert_eq!(h.session.board().unwrap().progress().matched_pairs, 1);
        assert_eq!(h.sink.names(), vec!["flip", "flip", "match"]);
    }

    #[test]
    fn test_mismatch_resets_combo_and_reverts() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        h.play_match(0);
        assert_eq!(h.session.score().unwrap().combo_streak, 1);

        let (a, _) = h.pair(1);
        let (b, _) = h.pair(2);
        h.session.select(a);
        h.session.select(b);
        h.clock.advance_millis(500);
        assert_eq!(h.poll(), vec![SessionEvent::Mismatched]);

        let score = h.session.score().unwrap();
        assert_eq!(score.combo_streak, 0);
        assert_eq!(score.running_score, 150);
        // still face up and locked during the settle delay
        let board = h.session.board().unwrap();
        assert_eq!(board.card(a).unwrap().face(), FaceState::Revealed);
        let (other, _) = h.pair(3);
        assert_eq!(h.session.select(other), Outcome::Ignored);

        h.clock.advance_millis(1000);
        assert_eq!(h.poll(), vec![SessionEvent::Reverted]);
        let board = h.session.board().unwrap();
        assert_eq!(board.card(a).unwrap().face(), FaceState::Hidden);
        assert_eq!(board.card(b).unwrap().face(), FaceState::Hidden);
        assert!(!board.is_locked());
    }

    #[test]
    fn test_perfect_when_moves_equal_perfect_count() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        for p in 0..6 {
            h.play_miss(p, (p + 1) % 6);
        }
        let mut game_over = None;
        for p in 0..6 {
            for event in h.play_match(p) {
                if let SessionEvent::GameOver(g) = event {
                    game_over = Some(g);
                }
            }
        }

        let game_over = game_over.expect("round should finish");
        assert_eq!(game_over.breakdown.move_count, 12);
        assert_eq!(game_over.breakdown.perfect_move_count, 12);
        assert!(game_over.breakdown.is_perfect);
        assert!(game_over.breakdown.perfect_bonus > 0);
        assert_eq!(h.session.state(), GameState::Finished);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let mut overs = 0;
        for p in 0..6 {
            overs += h
                .play_match(p)
                .iter()
                .filter(|e| matches!(e, SessionEvent::GameOver(_)))
                .count();
        }
        h.clock.advance_millis(10_000);
        overs += h.session.poll().len();
        assert_eq!(overs, 1);
        assert_eq!(
            h.sink.names().iter().filter(|n| **n == "victory").count(),
            1
        );

        let over = h.session.game_over().unwrap();
        assert_eq!(over.breakdown.max_combo_streak, 6);
        assert!(over.leaderboard_eligible);
        assert!(over.winners.is_empty());
        assert_eq!(h.session.select(0), Outcome::Ignored);
    }

    #[test]
    fn test_timer_frozen_at_completion() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        for p in 0..6 {
            h.play_match(p);
        }
        // 6 rounds of 1.5s
        let over = h.session.game_over().unwrap().clone();
        assert_eq!(over.breakdown.elapsed_seconds, 8);
        h.clock.advance_millis(60_000);
        assert_eq!(h.session.score().unwrap().elapsed_seconds, 8);
    }

    #[test]
    fn test_combo_notifications() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        h.play_match(0);
        h.play_match(1);
        h.sink.drain();
        h.play_match(2);
        assert_eq!(
            h.sink.drain(),
            vec![
                Notification::Flip,
                Notification::Flip,
                Notification::Match,
                Notification::Combo(3)
            ]
        );
    }

    #[test]
    fn test_multiplayer_turn_rotation() {
        let mut h = harness();
        h.session
            .start_multiplayer(Difficulty::Easy, &["Ann", "Bob", "Cy"])
            .unwrap();
        assert_eq!(h.session.current_player().unwrap().index(), 0);

        let events = h.play_miss(0, 1);
        assert!(events.contains(&SessionEvent::TurnChanged(1)));
        assert_eq!(h.session.current_player().unwrap().index(), 1);

        let events = h.play_match(2);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Matched { player: Some(1), .. }]
        ));
        assert_eq!(h.session.current_player().unwrap().index(), 1);
        assert_eq!(h.session.players()[1].matches_won(), 1);
        assert_eq!(h.session.players()[1].score(), 150);
        assert_eq!(h.session.players()[0].matches_won(), 0);
    }

    #[test]
    fn test_multiplayer_turn_wraps() {
        let mut h = harness();
        h.session
            .start_multiplayer(Difficulty::Easy, &["Ann", "Bob"])
            .unwrap();
        h.play_miss(0, 1);
        h.play_miss(0, 1);
        assert_eq!(h.session.current_player().unwrap().index(), 0);
        assert!(h.sink.names().contains(&"turnChange"));
    }

    #[test]
    fn test_multiplayer_winners_and_no_leaderboard() {
        let mut h = harness();
        h.session
            .start_multiplayer(Difficulty::Easy, &["Ann", "Bob"])
            .unwrap();
        h.play_match(0);
        h.play_match(1);
        h.play_miss(2, 3);
        for p in 2..6 {
            h.play_match(p);
        }
        let over = h.session.game_over().unwrap();
        assert_eq!(over.winners, vec![1]);
        assert!(!over.leaderboard_eligible);
        assert_eq!(
            h.session.submit_score("Bob").unwrap_err(),
            SessionError::NotSinglePlayer
        );
    }

    #[test]
    fn test_invalid_player_count() {
        let mut h = harness();
        let err = h
            .session
            .start_multiplayer(Difficulty::Easy, &["Solo"])
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidPlayerCount { got: 1, max: 4 });
        let err = h
            .session
            .start_multiplayer(Difficulty::Easy, &["a", "b", "c", "d", "e"])
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidPlayerCount { got: 5, max: 4 });
        assert_eq!(h.session.state(), GameState::Idle);
    }

    #[test]
    fn test_pause_freezes_timer_and_board() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        h.clock.advance_millis(3000);
        assert!(h.session.pause());
        assert!(!h.session.pause());
        assert_eq!(h.session.state(), GameState::Paused);

        h.clock.advance_millis(60_000);
        assert!(h.session.poll().is_empty());
        assert_eq!(h.session.score().unwrap().elapsed_seconds, 3);
        assert!(h.session.score().unwrap().paused);
        assert_eq!(h.session.select(0), Outcome::Ignored);

        assert!(h.session.resume());
        assert!(!h.session.resume());
        h.clock.advance_millis(1000);
        assert_eq!(h.session.poll(), vec![SessionEvent::Tick(4)]);
        assert_eq!(h.session.select(0), Outcome::Flipped);
    }

    #[test]
    fn test_pending_resolution_waits_out_pause() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let (a, b) = h.pair(0);
        h.session.select(a);
        h.session.select(b);
        h.session.pause();
        h.clock.advance_millis(5000);
        assert!(h.session.poll().is_empty());
        assert_eq!(h.session.pending_tasks(), 1);

        h.session.resume();
        let events = h.session.poll();
        assert!(matches!(events[0], SessionEvent::Matched { .. }));
    }

    #[test]
    fn test_restart_discards_pending_resolution() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let (a, b) = h.pair(0);
        h.session.select(a);
        h.session.select(b);
        assert_eq!(h.session.pending_tasks(), 1);

        h.session.restart().unwrap();
        assert_eq!(h.session.pending_tasks(), 0);
        h.clock.advance_millis(5000);
        h.session.poll();

        let board = h.session.board().unwrap();
        assert_eq!(board.progress().matched_pairs, 0);
        assert!(board.cards().iter().all(|c| c.face() == FaceState::Hidden));
        assert_eq!(h.session.score().unwrap().move_count, 0);
        assert_eq!(h.session.state(), GameState::Playing);
    }

    #[test]
    fn test_stale_task_is_discarded() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let old_round = h.session.round.as_ref().unwrap().id;
        h.session.restart().unwrap();

        // new round has a revealed pair; a task from the old round must not
        // resolve it
        let (a, b) = h.pair(0);
        h.session.select(a);
        h.session.select(b);
        h.session.scheduler.cancel_all();
        h.session
            .scheduler
            .schedule(old_round, TaskKind::Adjudicate, Duration::ZERO);

        h.clock.advance_millis(10);
        h.session.poll();
        let board = h.session.board().unwrap();
        assert_eq!(board.progress().matched_pairs, 0);
        assert!(board.is_locked());
    }

    #[test]
    fn test_quit_returns_to_idle() {
        let mut h = harness();
        h.session.start_single(Difficulty::Medium).unwrap();
        let (a, b) = h.pair(0);
        h.session.select(a);
        h.session.select(b);
        h.session.quit();

        assert_eq!(h.session.state(), GameState::Idle);
        assert!(h.session.board().is_none());
        assert_eq!(h.session.pending_tasks(), 0);
        assert!(h.session.game_over().is_none());
        h.clock.advance_millis(5000);
        assert!(h.session.poll().is_empty());
        assert_eq!(
            h.session.submit_score("x").unwrap_err(),
            SessionError::NotFinished
        );
    }

    #[test]
    fn test_submit_score_ranks_once() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        assert_eq!(
            h.session.submit_score("Ann").unwrap_err(),
            SessionError::NotFinished
        );
        for p in 0..6 {
            h.play_match(p);
        }
        let sub = h.session.submit_score("  Ann  ").unwrap();
        assert_eq!(sub.rank, Rank::Ranked(1));
        assert!(sub.persist_error.is_none());
        let entry = &h.session.leaderboard().entries(Difficulty::Easy)[0];
        assert_eq!(entry.name, "Ann");
        assert_eq!(entry.score, h.session.game_over().unwrap().breakdown.total);

        assert_eq!(
            h.session.submit_score("Ann").unwrap_err(),
            SessionError::AlreadySubmitted
        );
    }

    #[test]
    fn test_store_failure_keeps_round_state() {
        let leaderboard = Leaderboard::load(Box::new(UnavailableStore::new("offline"))).0;
        let mut h = harness_with(leaderboard, 24);
        h.session.start_single(Difficulty::Easy).unwrap();
        for p in 0..6 {
            h.play_match(p);
        }
        let before = h.session.game_over().unwrap().clone();
        let score_before = h.session.score().unwrap();

        let sub = h.session.submit_score("Ann").unwrap();
        assert_eq!(sub.rank, Rank::Ranked(1));
        assert!(matches!(sub.persist_error, Some(StoreError::Unavailable(_))));
        assert_eq!(h.session.game_over().unwrap(), &before);
        assert_eq!(h.session.score().unwrap(), score_before);
        assert_eq!(h.session.state(), GameState::Finished);
    }

    #[test]
    fn test_symbol_shortfall_clamps_round() {
        let leaderboard = Leaderboard::load(Box::new(MemoryStore::new())).0;
        let mut h = harness_with(leaderboard, 4);
        h.session.start_single(Difficulty::Easy).unwrap();
        assert_eq!(h.session.board().unwrap().len(), 8);
        assert!(matches!(
            h.session.deck_shortfall(),
            Some(DeckError::InsufficientSymbols {
                requested: 6,
                available: 4
            })
        ));
        for p in 0..4 {
            h.play_match(p);
        }
        assert_eq!(h.session.state(), GameState::Finished);
    }

    #[test]
    fn test_empty_symbol_source_fails_start() {
        let leaderboard = Leaderboard::load(Box::new(MemoryStore::new())).0;
        let mut h = harness_with(leaderboard, 0);
        let err = h.session.start_single(Difficulty::Easy).unwrap_err();
        assert!(matches!(err, SessionError::Deck(DeckError::EmptySymbolSource(_))));
        assert_eq!(h.session.state(), GameState::Idle);
    }

    #[test]
    fn test_failed_start_keeps_current_round() {
        let mut h = harness();
        h.session.start_single(Difficulty::Easy).unwrap();
        let (a, b) = h.pair(0);
        h.session.select(a);
        h.session.select(b);

        h.session.services.symbols = Box::new(FixedSymbols::numbered(0));
        assert!(h.session.start_single(Difficulty::Hard).is_err());
        assert!(h
            .session
            .start_multiplayer(Difficulty::Medium, &["Ann", "Bob"])
            .is_err());
        assert!(h.session.restart().is_err());

        assert_eq!(h.session.mode(), GameMode::SinglePlayer);
        assert_eq!(h.session.difficulty(), Difficulty::Easy);
        assert!(h.session.players().is_empty());
        assert_eq!(h.session.pending_tasks(), 1);

        // the pending resolution still unlocks the board
        h.clock.advance_millis(500);
        assert!(matches!(
            h.poll().as_slice(),
            [SessionEvent::Matched { pair_id: 0, .. }]
        ));
        assert!(!h.session.board().unwrap().is_locked());
    }

    #[test]
    fn test_view_snapshot() {
        let mut h = harness();
        h.session
            .start_multiplayer(Difficulty::Hard, &["Ann", "Bob"])
            .unwrap();
        let view = h.session.view();
        assert_eq!(view.mode, GameMode::Multiplayer);
        assert_eq!(view.state, GameState::Playing);
        assert_eq!(view.difficulty, Difficulty::Hard);
        assert_eq!(view.progress.unwrap().total_pairs, 12);
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.current_turn, Some(0));
        assert!(view.game_over.is_none());
    }
}
