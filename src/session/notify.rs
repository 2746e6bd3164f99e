use std::cell::RefCell;
use std::rc::Rc;

/// Fire-and-forget events for the audio / presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Flip,
    Match,
    NoMatch,
    /// Streak length that triggered the combo
    Combo(u32),
    Victory,
    /// Index of the player whose turn it now is
    TurnChange(usize),
}

impl Notification {
    /// Event name as seen by sound and UI hooks
    pub fn name(self) -> &'static str {
        match self {
            Notification::Flip => "flip",
            Notification::Match => "match",
            Notification::NoMatch => "noMatch",
            Notification::Combo(_) => "combo",
            Notification::Victory => "victory",
            Notification::TurnChange(_) => "turnChange",
        }
    }
}

/// Receives notifications. Must not block; the engine ignores any outcome.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Queues notifications for later inspection. Clones share the queue.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued notifications
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|n| n.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.events.borrow_mut().push(notification);
    }
}
