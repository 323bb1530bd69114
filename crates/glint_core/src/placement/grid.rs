use super::{ActivePlacementSet, PlacementStrategy, Slot};
use crate::math::{Bounds, Vec2};
use rand::Rng;
use std::collections::VecDeque;

/// Hands out the centres of a `width × height` grid in row-major order.
///
/// Cell indices are `u32`; configs are capped at
/// [`MAX_GRID_CELLS`](crate::config::MAX_GRID_CELLS) cells.
///
/// Every cell is offered once per pass before any repeats. When a pass runs
/// dry the full grid is regenerated, cells too close to live entities are
/// filtered out (order preserved), and the dequeue is retried once.
///
/// Queued cells can go stale between refills, so each one is re-checked
/// against the active set when it is dequeued; stale cells are dropped for
/// the rest of the pass.
#[derive(Debug, Clone)]
pub struct GridPlacement {
    area: Bounds,
    width: u32,
    height: u32,
    queue: VecDeque<Slot>,
}

impl GridPlacement {
    pub fn new(area: Bounds, width: u32, height: u32) -> Self {
        let mut grid = Self {
            area,
            width,
            height,
            queue: VecDeque::new(),
        };
        grid.reset();
        grid
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Cells still waiting in the current pass.
    pub fn pending(&self) -> impl Iterator<Item = &Slot> {
        self.queue.iter()
    }

    /// Every cell centre, row by row from `area.min`.
    pub fn cells(&self) -> impl Iterator<Item = Slot> + '_ {
        let size = Vec2::new(self.width as f32, self.height as f32);
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| {
                let t = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / size;
                Slot::in_cell(self.area.lerp(t), y * self.width + x)
            })
        })
    }

    fn refill(&mut self, active: &ActivePlacementSet) {
        let open: Vec<Slot> = self
            .cells()
            .filter(|slot| active.is_clear(slot.position))
            .collect();
        tracing::trace!(open = open.len(), total = self.cell_count(), "refilled grid queue");
        self.queue.clear();
        self.queue.extend(open);
    }

    fn dequeue_clear(&mut self, active: &ActivePlacementSet) -> Option<Slot> {
        while let Some(slot) = self.queue.pop_front() {
            if active.is_clear(slot.position) {
                return Some(slot);
            }
        }
        None
    }
}

impl PlacementStrategy for GridPlacement {
    fn next_slot<R: Rng + ?Sized>(
        &mut self,
        active: &ActivePlacementSet,
        _rng: &mut R,
    ) -> Option<Slot> {
        if let Some(slot) = self.dequeue_clear(active) {
            return Some(slot);
        }
        self.refill(active);
        self.dequeue_clear(active)
    }

    fn reset(&mut self) {
        self.queue.clear();
        let cells: Vec<Slot> = self.cells().collect();
        self.queue.extend(cells);
    }
}
