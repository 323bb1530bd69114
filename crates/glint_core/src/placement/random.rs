use super::{ActivePlacementSet, PlacementStrategy, Slot};
use crate::math::Bounds;
use rand::Rng;

/// Default number of samples before giving up for this wake-up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Uniform sampling inside the play area with a fixed retry budget.
///
/// Each attempt costs one distance check per live entity; with the budget
/// spent the strategy reports no position and the caller tries again later.
#[derive(Debug, Clone)]
pub struct RandomRetryPlacement {
    area: Bounds,
    max_attempts: u32,
}

impl RandomRetryPlacement {
    pub fn new(area: Bounds, max_attempts: u32) -> Self {
        Self { area, max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl PlacementStrategy for RandomRetryPlacement {
    fn next_slot<R: Rng + ?Sized>(
        &mut self,
        active: &ActivePlacementSet,
        rng: &mut R,
    ) -> Option<Slot> {
        for attempt in 0..self.max_attempts {
            let position = self.area.sample(rng);
            if active.is_clear(position) {
                tracing::trace!(attempt, ?position, "random placement accepted");
                return Some(Slot::at(position));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{seeded_rng, Vec2};
    use crate::pool::Handle;

    #[test]
    fn samples_inside_area() {
        let area = Bounds::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0));
        let mut placement = RandomRetryPlacement::new(area, DEFAULT_MAX_ATTEMPTS);
        let active = ActivePlacementSet::new(0.5);
        let mut rng = seeded_rng(Some(11));

        for _ in 0..100 {
            let slot = placement.next_slot(&active, &mut rng).unwrap();
            assert!(area.contains(slot.position));
            assert_eq!(slot.cell, None);
        }
    }

    #[test]
    fn gives_up_when_area_is_covered() {
        let area = Bounds::new(Vec2::ZERO, Vec2::ONE);
        let mut placement = RandomRetryPlacement::new(area, DEFAULT_MAX_ATTEMPTS);
        let mut active = ActivePlacementSet::new(5.0);
        active.insert(Handle::new(0, 0), Slot::at(Vec2::splat(0.5)));
        let mut rng = seeded_rng(Some(12));

        assert_eq!(placement.next_slot(&active, &mut rng), None);
    }

    #[test]
    fn zero_attempts_never_places() {
        let mut placement = RandomRetryPlacement::new(Bounds::default(), 0);
        let active = ActivePlacementSet::new(0.0);
        let mut rng = seeded_rng(Some(13));
        assert_eq!(placement.next_slot(&active, &mut rng), None);
    }
}
