//! Spawn scheduling
//!
//! [`SpawnTimer`] is the cancellable wait between spawn attempts: it records
//! how long is left and is advanced by the external tick. [`SpawnScheduler`]
//! runs one spawn decision each time the timer fires and owns everything
//! that decision touches (pool, placement strategy, active set).

use crate::config::GameConfig;
use crate::entity::Spawnable;
use crate::error::ConfigError;
use crate::lifecycle::LifecycleState;
use crate::math::Vec2;
use crate::placement::{ActivePlacementSet, Placement, PlacementStrategy, Slot};
use crate::pool::{Handle, PoolStats, ResourcePool};
use glint_metrics::Counter;
use rand::Rng;
use std::time::Duration;

/// Wait between spawn attempts, sampled uniformly from `[min, max]`.
///
/// At most one wake-up is reported per `advance`. Overshoot is discarded and
/// the next wait starts from the wake-up, so a long stall never queues up a
/// burst of spawns.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    min: Duration,
    max: Duration,
    remaining: Option<Duration>,
    cycle: u64,
}

impl SpawnTimer {
    pub fn new(min: Duration, max: Duration) -> Self {
        debug_assert!(min <= max);
        Self {
            min,
            max,
            remaining: None,
            cycle: 0,
        }
    }

    /// Begin a fresh wait, replacing any wait already in progress.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining = Some(self.sample(rng));
        self.cycle += 1;
    }

    /// Cancel the pending wait. No-op when already stopped.
    pub fn stop(&mut self) {
        self.remaining = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left in the current wait.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Number of waits begun through `start`. A restart counts as a new
    /// cycle; the old one is gone.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Advance by `delta`. Returns `true` when the wait elapsed, in which
    /// case the next wait has already been sampled.
    pub fn advance<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if delta < remaining {
            self.remaining = Some(remaining - delta);
            return false;
        }
        self.remaining = Some(self.sample(rng));
        true
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOutcome {
    /// The timer did not fire (or is stopped).
    Waiting,
    /// Woke up outside the `Active` state.
    Inactive,
    /// Woke up with `max_on_screen` entities already live.
    AtCapacity,
    /// Placement found no position far enough from the live entities.
    NoPosition,
    /// A position was found but the pool had nothing to hand out.
    PoolExhausted,
    Spawned { handle: Handle, slot: Slot },
}

impl SpawnOutcome {
    /// Counter name for this outcome, `None` for ticks that did nothing.
    pub fn metric_name(&self) -> Option<&'static str> {
        match self {
            SpawnOutcome::Waiting => None,
            SpawnOutcome::Inactive => Some("skipped_inactive"),
            SpawnOutcome::AtCapacity => Some("skipped_cap"),
            SpawnOutcome::NoPosition => Some("no_position"),
            SpawnOutcome::PoolExhausted => Some("pool_exhausted"),
            SpawnOutcome::Spawned { .. } => Some("spawned"),
        }
    }
}

/// Decides when and where entities appear, and takes them back.
pub struct SpawnScheduler<T> {
    timer: SpawnTimer,
    pool: ResourcePool<T>,
    placement: Placement,
    active: ActivePlacementSet,
    max_on_screen: usize,
    outcomes: Counter,
}

impl<T: Spawnable> SpawnScheduler<T> {
    /// Build from a config. The scheduler starts stopped.
    pub fn new(
        config: &GameConfig,
        factory: impl FnMut() -> T + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (min, max) = config.spawn.interval_range();
        let pool = ResourcePool::new(config.pool.initial_size, config.pool.max_size, factory)?;

        Ok(Self {
            timer: SpawnTimer::new(min, max),
            pool,
            placement: Placement::from_config(&config.placement),
            active: ActivePlacementSet::new(config.placement.min_distance),
            max_on_screen: config.spawn.max_on_screen,
            outcomes: Counter::new(),
        })
    }

    /// Start (or restart) the wait cycle.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.timer.start(rng);
        tracing::debug!(cycle = self.timer.cycle(), "spawning started");
    }

    /// Cancel the wait cycle. Takes effect before the next tick.
    pub fn stop(&mut self) {
        if self.timer.is_running() {
            tracing::debug!("spawning stopped");
        }
        self.timer.stop();
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.timer.is_running()
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    /// Advance the wait and, if it fired, make one spawn decision.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        delta: Duration,
        state: LifecycleState,
        rng: &mut R,
    ) -> SpawnOutcome {
        if !self.timer.advance(delta, rng) {
            return SpawnOutcome::Waiting;
        }
        let outcome = self.decide(state, rng);
        if let Some(name) = outcome.metric_name() {
            self.outcomes.increment(name, 1);
        }
        outcome
    }

    fn decide<R: Rng + ?Sized>(&mut self, state: LifecycleState, rng: &mut R) -> SpawnOutcome {
        if state != LifecycleState::Active {
            tracing::trace!(%state, "spawn skipped: not active");
            return SpawnOutcome::Inactive;
        }
        if self.active.len() >= self.max_on_screen {
            tracing::trace!(live = self.active.len(), "spawn skipped: at capacity");
            return SpawnOutcome::AtCapacity;
        }

        let Some(slot) = self.placement.next_slot(&self.active, rng) else {
            tracing::trace!(live = self.active.len(), "spawn skipped: no position");
            return SpawnOutcome::NoPosition;
        };
        let Some(handle) = self.pool.acquire() else {
            tracing::trace!(?slot, "spawn skipped: pool exhausted");
            return SpawnOutcome::PoolExhausted;
        };

        if let Some(entity) = self.pool.get_mut(handle) {
            entity.spawn_at(slot.position);
        }
        self.active.insert(handle, slot);
        tracing::debug!(%handle, position = ?slot.position, cell = ?slot.cell, "spawned");
        SpawnOutcome::Spawned { handle, slot }
    }

    /// Deregister `handle` and return it to the pool. Safe to call twice;
    /// the second call finds nothing and returns `None`.
    pub fn consume(&mut self, handle: Handle) -> Option<Slot> {
        let slot = self.active.remove(handle);
        if self.pool.is_active(handle) {
            self.pool.release(handle);
        }
        if slot.is_some() {
            tracing::debug!(%handle, "consumed");
        }
        slot
    }

    /// Release every live entity and forget their positions. The pool keeps
    /// its instances for reuse.
    pub fn clear_all(&mut self) {
        let released = self.active.len();
        for handle in self.active.handles() {
            self.pool.release(handle);
        }
        self.active.clear();
        self.placement.reset();
        tracing::debug!(released, "cleared live entities");
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn max_on_screen(&self) -> usize {
        self.max_on_screen
    }

    pub fn active(&self) -> &ActivePlacementSet {
        &self.active
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// A live entity; `None` for free or stale handles.
    pub fn entity(&self, handle: Handle) -> Option<&T> {
        if !self.active.contains(handle) {
            return None;
        }
        self.pool.get(handle)
    }

    pub fn entity_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.active.contains(handle) {
            return None;
        }
        self.pool.get_mut(handle)
    }

    /// First live entity (in spawn order) under `point`.
    pub fn find_at(&self, point: Vec2, radius: f32) -> Option<Handle> {
        self.active.iter().map(|(handle, _)| handle).find(|&handle| {
            self.pool
                .get(handle)
                .is_some_and(|entity| entity.hit_test(point, radius))
        })
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn outcomes(&self) -> &Counter {
        &self.outcomes
    }
}
