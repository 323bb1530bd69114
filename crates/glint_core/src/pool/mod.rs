//! Bounded recycling pool
//!
//! Instances are created lazily through a factory up to a hard cap and are
//! recycled through a FIFO free queue instead of being dropped.

mod handle;
mod pool;

pub use handle::Handle;
pub use pool::{Poolable, PoolError, PoolStats, ResourcePool};
