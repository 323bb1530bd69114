//! Glint Core
//!
//! Headless gameplay core for a timed collect-the-pickups round:
//! - Bounded object pool with generational handles
//! - Grid and random-retry placement with minimum spacing
//! - Spawn scheduling driven by an external tick
//! - Lifecycle state machine (loading, active, suspended, terminal)
//! - Score and countdown session, surfaced as events

pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod lifecycle;
pub mod math;
pub mod placement;
pub mod pool;
pub mod scheduler;
pub mod session;
pub mod time;

pub use glam;

pub use config::GameConfig;
pub use entity::{Lifetime, Pickup, Spawnable};
pub use error::ConfigError;
pub use events::GameEvent;
pub use game::{BackAction, Game};
pub use lifecycle::{LifecycleState, Transition};
pub use pool::{Handle, Poolable, ResourcePool};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
