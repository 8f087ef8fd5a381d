//! Intents: the closed set of things input sources and the gravity timer can ask for.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    PauseToggle,
    Start,
    Restart,
    /// Gravity step, enqueued by the tick scheduler.
    Tick,
}

impl Intent {
    /// Player intents (everything except the timer's).
    pub const INPUT: [Self; 8] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::HardDrop,
        Self::Rotate,
        Self::PauseToggle,
        Self::Start,
        Self::Restart,
    ];

    /// Movement intents are dropped unless a game is running and not paused.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Self::MoveLeft | Self::MoveRight | Self::SoftDrop | Self::HardDrop | Self::Rotate
        )
    }
}

/// FIFO of intents from every source; processed serially by the session.
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    queue: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn pop(&mut self) -> Option<Intent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Extend<Intent> for IntentQueue {
    fn extend<T: IntoIterator<Item = Intent>>(&mut self, iter: T) {
        self.queue.extend(iter);
    }
}
