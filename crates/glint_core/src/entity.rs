//! Spawnable entities
//!
//! The scheduler places and recycles anything implementing [`Spawnable`].
//! [`Pickup`] is the stock implementation: a collectible that disappears
//! on its own after a fixed lifetime.

use crate::config::PickupConfig;
use crate::math::Vec2;
use crate::pool::Poolable;
use std::time::Duration;

/// Result of advancing an entity's lifetime by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    Alive,
    Expired,
}

/// What the spawn loop needs from a pooled entity.
///
/// Entities report their own end of life: `advance` returns
/// [`Lifetime::Expired`] once, and the owner then hands the handle back
/// for deregistration and release.
pub trait Spawnable: Poolable {
    /// Initialise a freshly acquired instance at `position`.
    fn spawn_at(&mut self, position: Vec2);

    fn position(&self) -> Vec2;

    fn advance(&mut self, delta: Duration) -> Lifetime;

    /// Claim the entity. Returns its point value the first time only.
    fn collect(&mut self) -> Option<u32>;

    fn hit_test(&self, point: Vec2, radius: f32) -> bool {
        self.position().distance(point) <= radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickupState {
    Idle,
    Live,
    Collected,
    Expired,
}

/// Collectible with a fixed lifetime and point value.
#[derive(Debug, Clone)]
pub struct Pickup {
    position: Vec2,
    lifetime: Duration,
    elapsed: Duration,
    points: u32,
    state: PickupState,
}

impl Pickup {
    pub fn new(lifetime: Duration, points: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            lifetime,
            elapsed: Duration::ZERO,
            points,
            state: PickupState::Idle,
        }
    }

    /// Factory for a pool of pickups. Expects a validated config.
    pub fn factory(config: &PickupConfig, points: u32) -> impl FnMut() -> Pickup + 'static {
        let lifetime = Duration::from_secs_f32(config.lifetime);
        move || Pickup::new(lifetime, points)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Lifetime left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.lifetime.saturating_sub(self.elapsed)
    }

    /// True while the pickup can still be collected.
    pub fn is_interactable(&self) -> bool {
        self.state == PickupState::Live
    }
}

impl Poolable for Pickup {
    fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.elapsed = Duration::ZERO;
        self.state = PickupState::Idle;
    }
}

impl Spawnable for Pickup {
    fn spawn_at(&mut self, position: Vec2) {
        self.position = position;
        self.elapsed = Duration::ZERO;
        self.state = PickupState::Live;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn advance(&mut self, delta: Duration) -> Lifetime {
        if self.state != PickupState::Live {
            return Lifetime::Alive;
        }
        self.elapsed += delta;
        if self.elapsed >= self.lifetime {
            self.state = PickupState::Expired;
            return Lifetime::Expired;
        }
        Lifetime::Alive
    }

    fn collect(&mut self) -> Option<u32> {
        if self.state != PickupState::Live {
            return None;
        }
        self.state = PickupState::Collected;
        Some(self.points)
    }
}
