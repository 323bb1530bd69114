//! Pool handles
//!
//! A handle names one instance owned by a `ResourcePool`. It is only a
//! reference: the instance itself stays inside the pool and is reached
//! through `ResourcePool::get` / `get_mut`.

use std::fmt;

/// Opaque reference to a pooled instance.
///
/// - Index: position of the instance in the pool's backing storage
/// - Generation: bumped by `ResourcePool::clear`, so handles issued before a
///   clear never resolve to instances created after it
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
