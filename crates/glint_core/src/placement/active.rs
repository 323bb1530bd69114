use super::Slot;
use crate::math::Vec2;
use crate::pool::Handle;

/// Positions currently occupied by live entities.
///
/// Kept as a small vector in insertion order; lookups are linear, which is
/// cheaper than hashing at the entity counts this is built for.
#[derive(Debug, Clone)]
pub struct ActivePlacementSet {
    entries: Vec<(Handle, Slot)>,
    min_distance: f32,
}

impl ActivePlacementSet {
    pub fn new(min_distance: f32) -> Self {
        Self {
            entries: Vec::new(),
            min_distance,
        }
    }

    #[inline]
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Register `handle` at `slot`. Returns `false` (and changes nothing) if
    /// the handle is already registered.
    pub fn insert(&mut self, handle: Handle, slot: Slot) -> bool {
        if self.contains(handle) {
            return false;
        }
        self.entries.push((handle, slot));
        true
    }

    /// Deregister `handle`, returning the slot it occupied.
    pub fn remove(&mut self, handle: Handle) -> Option<Slot> {
        let index = self.entries.iter().position(|(h, _)| *h == handle)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.iter().any(|(h, _)| *h == handle)
    }

    pub fn slot_of(&self, handle: Handle) -> Option<Slot> {
        self.entries
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, slot)| *slot)
    }

    /// True when `position` is at least `min_distance` from every entry.
    pub fn is_clear(&self, position: Vec2) -> bool {
        self.entries
            .iter()
            .all(|(_, slot)| slot.position.distance(position) >= self.min_distance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, Slot)> + '_ {
        self.entries.iter().copied()
    }

    pub fn handles(&self) -> Vec<Handle> {
        self.entries.iter().map(|(handle, _)| *handle).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
