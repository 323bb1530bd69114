use super::Handle;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Hooks a pooled type exposes to its pool.
pub trait Poolable {
    /// Called every time the instance leaves the free queue.
    fn on_acquire(&mut self) {}

    /// Clear transient state. Runs once after creation during prewarm and
    /// on every release.
    fn reset(&mut self);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool max size {max} is below its initial size {initial}")]
    CapacityBelowInitial { initial: usize, max: usize },
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub created: usize,
    pub free: usize,
    pub active: usize,
    pub max_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Active,
}

struct Slot<T> {
    value: T,
    state: SlotState,
}

/// Bounded pool of reusable instances.
///
/// Every instance is in exactly one of two states: `Free` (sitting in the
/// free queue, owned by the pool) or `Active` (handed out). The number of
/// instances ever created never exceeds `max_size` until `clear` tears
/// everything down.
pub struct ResourcePool<T> {
    factory: Box<dyn FnMut() -> T>,
    slots: Vec<Slot<T>>,
    free: VecDeque<u32>,
    initial_size: usize,
    max_size: usize,
    generation: u32,
}

impl<T: Poolable> ResourcePool<T> {
    /// Create a pool and prewarm it with `initial_size` instances.
    pub fn new(
        initial_size: usize,
        max_size: usize,
        factory: impl FnMut() -> T + 'static,
    ) -> Result<Self, PoolError> {
        if max_size < initial_size {
            return Err(PoolError::CapacityBelowInitial {
                initial: initial_size,
                max: max_size,
            });
        }

        let mut pool = Self {
            factory: Box::new(factory),
            slots: Vec::with_capacity(max_size),
            free: VecDeque::with_capacity(max_size),
            initial_size,
            max_size,
            generation: 0,
        };
        pool.prewarm(initial_size);
        Ok(pool)
    }

    /// Eagerly create up to `count` instances, reset them and queue them as
    /// free. Stops at `max_size`; returns how many were created.
    pub fn prewarm(&mut self, count: usize) -> usize {
        let room = self.max_size - self.slots.len();
        let count = count.min(room);
        for _ in 0..count {
            let index = self.create();
            self.slots[index as usize].value.reset();
            self.free.push_back(index);
        }
        if count > 0 {
            tracing::debug!(count, created = self.slots.len(), "prewarmed pool");
        }
        count
    }

    /// Take a free instance, creating one if the pool is still below its
    /// cap. `None` means the pool is exhausted; callers skip and retry later.
    pub fn acquire(&mut self) -> Option<Handle> {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None if self.slots.len() < self.max_size => self.create(),
            None => return None,
        };

        let slot = &mut self.slots[index as usize];
        slot.state = SlotState::Active;
        slot.value.on_acquire();
        Some(Handle::new(index, self.generation))
    }

    /// Return an instance to the free queue.
    ///
    /// Releasing an instance that is already free is a no-op, as is a handle
    /// issued before the last `clear`. Returns whether anything changed.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slot_mut(handle) else {
            tracing::warn!(%handle, "release of a handle this pool does not own");
            return false;
        };
        if slot.state == SlotState::Free {
            return false;
        }

        slot.value.reset();
        slot.state = SlotState::Free;
        self.free.push_back(handle.index());
        true
    }

    /// Drop every instance regardless of state. The pool stays usable and
    /// behaves as if it had been built with an initial size of zero; handles
    /// issued before the clear stop resolving.
    pub fn clear(&mut self) {
        let dropped = self.slots.len();
        self.slots.clear();
        self.free.clear();
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(dropped, "cleared pool");
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slot(handle).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slot_mut(handle).map(|slot| &mut slot.value)
    }

    pub fn is_active(&self, handle: Handle) -> bool {
        self.slot(handle)
            .is_some_and(|slot| slot.state == SlotState::Active)
    }

    /// Handles of every active instance, in slot order.
    pub fn active_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == SlotState::Active)
            .map(|(index, _)| Handle::new(index as u32, self.generation))
    }

    #[inline]
    pub fn created_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created_count(),
            free: self.free_count(),
            active: self.active_count(),
            max_size: self.max_size,
        }
    }

    fn create(&mut self) -> u32 {
        debug_assert!(self.slots.len() < self.max_size);
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            value: (self.factory)(),
            state: SlotState::Free,
        });
        index
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        if handle.generation() != self.generation {
            return None;
        }
        self.slots.get(handle.index() as usize)
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot<T>> {
        if handle.generation() != self.generation {
            return None;
        }
        self.slots.get_mut(handle.index() as usize)
    }
}

impl<T> fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("created", &self.slots.len())
            .field("free", &self.free.len())
            .field("initial_size", &self.initial_size)
            .field("max_size", &self.max_size)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Token {
        resets: u32,
        acquires: u32,
        dirty: bool,
    }

    impl Poolable for Token {
        fn on_acquire(&mut self) {
            self.acquires += 1;
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.dirty = false;
        }
    }

    fn counting_pool(initial: usize, max: usize) -> (ResourcePool<Token>, Rc<Cell<usize>>) {
        let made = Rc::new(Cell::new(0));
        let counter = Rc::clone(&made);
        let pool = ResourcePool::new(initial, max, move || {
            counter.set(counter.get() + 1);
            Token::default()
        })
        .expect("valid capacities");
        (pool, made)
    }

    #[test]
    fn rejects_max_below_initial() {
        let err = ResourcePool::new(4, 3, Token::default).unwrap_err();
        assert_eq!(err, PoolError::CapacityBelowInitial { initial: 4, max: 3 });
    }

    #[test]
    fn prewarm_creates_and_resets() {
        let (pool, made) = counting_pool(2, 3);
        assert_eq!(made.get(), 2);
        assert_eq!(pool.free_count(), 2);
        assert_eq!(pool.active_count(), 0);
        for index in 0..2 {
            let handle = Handle::new(index, 0);
            assert_eq!(pool.get(handle).map(|t| t.resets), Some(1));
        }
    }

    #[test]
    fn acquire_uses_prewarmed_then_creates_then_exhausts() {
        let (mut pool, made) = counting_pool(2, 3);

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_eq!(made.get(), 2);

        let c = pool.acquire().unwrap();
        assert_eq!(made.get(), 3);
        assert_eq!(pool.created_count(), 3);

        assert!(pool.acquire().is_none());
        assert_eq!(made.get(), 3);

        let mut handles = vec![a, b, c];
        handles.sort();
        handles.dedup();
        assert_eq!(handles.len(), 3);
    }

    #[test]
    fn factory_runs_once_per_instance() {
        let (mut pool, made) = counting_pool(0, 1);
        for _ in 0..5 {
            let handle = pool.acquire().unwrap();
            assert!(pool.release(handle));
        }
        assert_eq!(made.get(), 1);
        let handle = pool.acquire().unwrap();
        assert_eq!(pool.get(handle).unwrap().acquires, 6);
    }

    #[test]
    fn release_is_idempotent() {
        let (mut pool, _) = counting_pool(0, 2);
        let handle = pool.acquire().unwrap();
        pool.get_mut(handle).unwrap().dirty = true;

        assert!(pool.release(handle));
        assert!(!pool.release(handle));

        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.created_count(), 1);
        assert!(!pool.get(handle).unwrap().dirty);
        assert_eq!(pool.get(handle).unwrap().resets, 1);
    }

    #[test]
    fn free_queue_is_fifo() {
        let (mut pool, _) = counting_pool(0, 3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(b);
        pool.release(a);
        assert_eq!(pool.acquire(), Some(b));
        assert_eq!(pool.acquire(), Some(a));
    }

    #[test]
    fn clear_invalidates_handles_and_allows_reuse() {
        let (mut pool, made) = counting_pool(2, 2);
        let stale = pool.acquire().unwrap();
        pool.clear();

        assert_eq!(pool.created_count(), 0);
        assert_eq!(pool.free_count(), 0);
        assert!(pool.get(stale).is_none());
        assert!(!pool.release(stale));

        let fresh = pool.acquire().unwrap();
        assert_ne!(fresh, stale);
        assert_eq!(made.get(), 3);
        assert!(pool.is_active(fresh));
        assert_eq!(pool.active_handles().collect::<Vec<_>>(), vec![fresh]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Acquire), (0usize..16).prop_map(Op::Release)]
    }

    proptest! {
        #[test]
        fn capacity_never_exceeded(
            initial in 0usize..4,
            extra in 0usize..4,
            ops in proptest::collection::vec(op(), 0..64),
        ) {
            let max = initial + extra;
            let (mut pool, made) = counting_pool(initial, max);
            let mut live: Vec<Handle> = Vec::new();

            for op in ops {
                match op {
                    Op::Acquire => match pool.acquire() {
                        Some(handle) => {
                            prop_assert!(!live.contains(&handle));
                            live.push(handle);
                        }
                        None => prop_assert_eq!(live.len(), max),
                    },
                    Op::Release(i) if !live.is_empty() => {
                        let handle = live.swap_remove(i % live.len());
                        prop_assert!(pool.release(handle));
                        prop_assert!(!pool.release(handle));
                    }
                    Op::Release(_) => {}
                }
                prop_assert!(pool.created_count() <= max);
                prop_assert_eq!(made.get(), pool.created_count());
                prop_assert_eq!(pool.active_count(), live.len());
                prop_assert_eq!(pool.free_count() + live.len(), pool.created_count());
            }
        }
    }
}
