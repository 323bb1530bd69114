//! Simulation time
//!
//! Ticks are driven externally with the real elapsed time of each step.
//! Drivers that want a fixed step use `TICK_DURATION`.

use std::time::Duration;

/// Default driver tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Simulation time tracker
#[derive(Debug, Clone, Default)]
pub struct SimulationTime {
    tick_count: u64,
    elapsed: Duration,
    last_delta: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Record one tick that covered `delta` of real time.
    pub fn advance(&mut self, delta: Duration) {
        self.tick_count += 1;
        self.elapsed += delta;
        self.last_delta = delta;
    }

    pub fn total_time(&self) -> Duration {
        self.elapsed
    }

    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }
}
