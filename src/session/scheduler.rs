use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Animation pacing delays, from the `[timing]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between revealing the second card and adjudicating the pair
    pub reveal_settle_ms: u64,
    /// Delay before a mismatched pair is turned back down
    pub mismatch_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            reveal_settle_ms: 500,
            mismatch_settle_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn reveal_settle(&self) -> Duration {
        Duration::from_millis(self.reveal_settle_ms)
    }

    pub fn mismatch_settle(&self) -> Duration {
        Duration::from_millis(self.mismatch_settle_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Compare the two revealed cards
    Adjudicate,
    /// Turn a mismatched pair face down
    RevertMismatch,
}

/// A delayed step tagged with the round it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub round: u64,
    pub kind: TaskKind,
    pub due: Duration,
}

/// Pending delayed tasks, fired in due order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, round: u64, kind: TaskKind, due: Duration) {
        let task = ScheduledTask { round, kind, due };
        // stable: equal due times keep insertion order
        let index = self.queue.partition_point(|t| t.due <= due);
        self.queue.insert(index, task);
    }

    /// Remove and return the earliest task due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledTask> {
        if self.queue.first().is_some_and(|t| t.due <= now) {
            Some(self.queue.remove(0))
        } else {
            None
        }
    }

    /// Drop every pending task.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.first().map(|t| t.due)
    }
}
