use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use super::store::{load_json, save_json, KeyValueStore};
use crate::error::StoreError;
use crate::game::Difficulty;

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub elapsed_seconds: u64,
    pub move_count: u32,
    pub timestamp_millis: i64,
    pub date_label: String,
}

impl LeaderboardEntry {
    /// Build an entry stamped with `at`.
    pub fn new(
        name: impl Into<String>,
        score: u64,
        elapsed_seconds: u64,
        move_count: u32,
        at: OffsetDateTime,
    ) -> Self {
        let millis = at.unix_timestamp_nanos() / 1_000_000;
        LeaderboardEntry {
            name: name.into(),
            score,
            elapsed_seconds,
            move_count,
            timestamp_millis: i64::try_from(millis).unwrap_or(i64::MAX),
            date_label: date_label(at),
        }
    }
}

fn date_label(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Higher score first, then faster time.
fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.elapsed_seconds.cmp(&b.elapsed_seconds))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    /// 1-based position on the board
    Ranked(usize),
    NotRanked,
}

/// Result of a score submission. The in-memory board is updated even if
/// persisting it failed.
#[derive(Debug)]
pub struct ScoreSubmission {
    pub rank: Rank,
    pub persist_error: Option<StoreError>,
}

/// Per-difficulty top scores backed by a key-value store.
pub struct Leaderboard {
    store: Box<dyn KeyValueStore>,
    boards: BTreeMap<Difficulty, Vec<LeaderboardEntry>>,
    capacity: usize,
}

impl Leaderboard {
    /// Load boards from `store`. On failure the leaderboard starts empty and
    /// the error is returned for the caller to surface.
    pub fn load(store: Box<dyn KeyValueStore>) -> (Leaderboard, Option<StoreError>) {
        let (mut boards, err) =
            match load_json::<BTreeMap<Difficulty, Vec<LeaderboardEntry>>>(&*store, LEADERBOARD_KEY)
            {
                Ok(boards) => (boards.unwrap_or_default(), None),
                Err(e) => {
                    tracing::warn!("failed to load leaderboard, starting empty: {e}");
                    (BTreeMap::new(), Some(e))
                }
            };

        // stored data may predate the ordering or capacity rules
        for entries in boards.values_mut() {
            entries.sort_by(rank_order);
            entries.truncate(LEADERBOARD_CAPACITY);
        }

        let leaderboard = Leaderboard {
            store,
            boards,
            capacity: LEADERBOARD_CAPACITY,
        };
        (leaderboard, err)
    }

    pub fn entries(&self, difficulty: Difficulty) -> &[LeaderboardEntry] {
        self.boards
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Position (0-based) a new result would take, if it makes the board.
    fn insertion_index(&self, difficulty: Difficulty, candidate: &LeaderboardEntry) -> Option<usize> {
        let entries = self.entries(difficulty);
        // ties go after existing entries
        let index = entries
            .iter()
            .position(|e| rank_order(candidate, e) == Ordering::Less)
            .unwrap_or(entries.len());
        (index < self.capacity).then_some(index)
    }

    /// Whether a result with this score and time would make the board.
    pub fn is_eligible(&self, difficulty: Difficulty, score: u64, elapsed_seconds: u64) -> bool {
        let probe = LeaderboardEntry {
            name: String::new(),
            score,
            elapsed_seconds,
            move_count: 0,
            timestamp_millis: 0,
            date_label: String::new(),
        };
        self.insertion_index(difficulty, &probe).is_some()
    }

    /// Insert an entry, keep the board sorted and capped, and persist.
    /// Entries that fall outside the cap leave the board unchanged.
    pub fn save_score(&mut self, difficulty: Difficulty, entry: LeaderboardEntry) -> ScoreSubmission {
        let Some(index) = self.insertion_index(difficulty, &entry) else {
            return ScoreSubmission {
                rank: Rank::NotRanked,
                persist_error: None,
            };
        };

        let capacity = self.capacity;
        let board = self.boards.entry(difficulty).or_default();
        board.insert(index, entry);
        board.truncate(capacity);
        tracing::info!(difficulty = %difficulty, rank = index + 1, "leaderboard updated");

        ScoreSubmission {
            rank: Rank::Ranked(index + 1),
            persist_error: self.persist().err(),
        }
    }

    /// Remove every entry for one difficulty.
    pub fn clear(&mut self, difficulty: Difficulty) -> Result<(), StoreError> {
        self.boards.remove(&difficulty);
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        save_json(&mut *self.store, LEADERBOARD_KEY, &self.boards).inspect_err(|e| {
            tracing::warn!("failed to persist leaderboard: {e}");
        })
    }
}
