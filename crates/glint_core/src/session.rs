//! Round counters: score and time left

use crate::config::SessionConfig;
use crate::events::{EventQueue, GameEvent};
use std::time::Duration;

/// How often the countdown reports itself while running.
pub const TIMER_REPORT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Session {
    duration: Duration,
    score: u32,
    time_remaining: Duration,
    since_report: Duration,
    active: bool,
    expired: bool,
}

impl Session {
    /// Expects a validated config.
    pub fn new(config: &SessionConfig) -> Self {
        let duration = Duration::from_secs_f32(config.duration);
        Self {
            duration,
            score: 0,
            time_remaining: duration,
            since_report: Duration::ZERO,
            active: false,
            expired: false,
        }
    }

    /// Reset counters to their configured starting values.
    pub fn start(&mut self, events: &mut EventQueue) {
        self.score = 0;
        self.time_remaining = self.duration;
        self.since_report = Duration::ZERO;
        self.active = true;
        self.expired = false;
        events.push(GameEvent::ScoreChanged(self.score));
        events.push(GameEvent::TimerChanged(self.time_remaining.as_secs_f32()));
    }

    /// Continue after a pause without touching the counters.
    pub fn resume(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Add points; ignored once the round is over.
    pub fn add_score(&mut self, points: u32, events: &mut EventQueue) -> bool {
        if !self.active {
            return false;
        }
        self.score = self.score.saturating_add(points);
        events.push(GameEvent::ScoreChanged(self.score));
        true
    }

    /// Run the clock down by `delta`. Returns `true` on the tick the time
    /// runs out (the first tick of a zero-length round), never again
    /// afterwards.
    pub fn countdown(&mut self, delta: Duration, events: &mut EventQueue) -> bool {
        if !self.active || self.expired {
            return false;
        }

        self.time_remaining = self.time_remaining.saturating_sub(delta);
        self.since_report += delta;

        self.expired = self.time_remaining.is_zero();
        if self.expired || self.since_report >= TIMER_REPORT_INTERVAL {
            self.since_report = Duration::ZERO;
            events.push(GameEvent::TimerChanged(self.time_remaining.as_secs_f32()));
        }
        self.expired
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
