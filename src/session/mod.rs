//! Round orchestration: turn sequencing, delayed resolution steps, pause and
//! restart, and the injected clock and notification services.

mod clock;
mod notify;
mod orchestrator;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::{Notification, NotificationSink, NullSink, RecordingSink};
pub use orchestrator::{
    GameMode, GameOver, GameState, Services, Session, SessionConfig, SessionEvent, SessionView,
};
pub use scheduler::{ScheduledTask, Scheduler, TaskKind, TimingConfig};
