use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    NotStarted,
    Running,
    Paused,
    Stopped,
}

/// Round timer as a duration accumulator over a monotonic time source.
///
/// Elapsed time is always derived from the start instant minus the total
/// time spent paused, so pausing and resuming cannot drift. Ticking only
/// reports whole-second boundaries; it never feeds back into the elapsed
/// computation.
#[derive(Debug, Clone)]
pub struct GameTimer {
    state: TimerState,
    started_at: Duration,
    paused_at: Duration,
    stopped_at: Duration,
    paused_total: Duration,
    last_tick: u64,
}

impl GameTimer {
    pub fn new() -> Self {
        GameTimer {
            state: TimerState::NotStarted,
            started_at: Duration::ZERO,
            paused_at: Duration::ZERO,
            stopped_at: Duration::ZERO,
            paused_total: Duration::ZERO,
            last_tick: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    /// Start timing. Only valid once.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.state != TimerState::NotStarted {
            return false;
        }
        self.started_at = now;
        self.state = TimerState::Running;
        true
    }

    pub fn pause(&mut self, now: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.paused_at = now;
        self.state = TimerState::Paused;
        true
    }

    pub fn resume(&mut self, now: Duration) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.paused_total += now.saturating_sub(self.paused_at);
        self.state = TimerState::Running;
        true
    }

    /// Freeze the timer for good. No further ticks are produced.
    pub fn stop(&mut self, now: Duration) -> bool {
        match self.state {
            TimerState::Running => {
                self.stopped_at = now;
            }
            TimerState::Paused => {
                // time spent paused does not count
                self.stopped_at = self.paused_at;
            }
            TimerState::NotStarted | TimerState::Stopped => return false,
        }
        self.state = TimerState::Stopped;
        true
    }

    /// Active (unpaused) time since start
    pub fn elapsed(&self, now: Duration) -> Duration {
        let end = match self.state {
            TimerState::NotStarted => return Duration::ZERO,
            TimerState::Running => now,
            TimerState::Paused => self.paused_at,
            TimerState::Stopped => self.stopped_at,
        };
        end.saturating_sub(self.started_at)
            .saturating_sub(self.paused_total)
    }

    pub fn elapsed_seconds(&self, now: Duration) -> u64 {
        self.elapsed(now).as_secs()
    }

    /// Report the elapsed whole seconds if a new second boundary was crossed
    /// since the last tick. Silent while paused or stopped.
    pub fn tick(&mut self, now: Duration) -> Option<u64> {
        if self.state != TimerState::Running {
            return None;
        }
        let secs = self.elapsed_seconds(now);
        if secs > self.last_tick {
            self.last_tick = secs;
            Some(secs)
        } else {
            None
        }
    }
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new()
    }
}
