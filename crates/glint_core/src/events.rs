//! Notifications for presentation layers
//!
//! The core never calls out to UI or audio. It queues events instead and
//! whoever renders the game drains them once per frame.

use crate::lifecycle::LifecycleState;
use crate::math::Vec2;
use crate::pool::Handle;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
    },
    ScoreChanged(u32),
    /// Seconds left in the round.
    TimerChanged(f32),
    Paused,
    Resumed,
    Spawned {
        handle: Handle,
        position: Vec2,
    },
    Collected {
        handle: Handle,
        position: Vec2,
        points: u32,
    },
    Expired {
        handle: Handle,
        position: Vec2,
    },
    Ended {
        final_score: u32,
    },
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
