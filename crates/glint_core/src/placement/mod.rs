//! Overlap-aware placement
//!
//! A placement strategy proposes the next position for a short-lived entity
//! so that it keeps at least `min_distance` from everything currently
//! registered in the [`ActivePlacementSet`]. Two strategies exist and are
//! picked once from configuration:
//!
//! - [`GridPlacement`]: walks a fixed grid of cells in order, refilling from
//!   the unoccupied cells once a pass is exhausted.
//! - [`RandomRetryPlacement`]: uniform samples with a bounded retry budget.
//!
//! Both report "no position" as `None`. That is backpressure, not failure:
//! the scheduler simply tries again on its next wake-up.
//!
//! The distance checks are linear in the number of live entities. That is
//! fine for a handful of pickups on screen and nothing more.

mod active;
mod grid;
mod random;

pub use active::ActivePlacementSet;
pub use grid::GridPlacement;
pub use random::{RandomRetryPlacement, DEFAULT_MAX_ATTEMPTS};

use crate::config::{PlacementConfig, PlacementMode};
use crate::math::Vec2;
use rand::Rng;

/// A candidate position. Grid slots also carry their cell index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: Vec2,
    pub cell: Option<u32>,
}

impl Slot {
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            cell: None,
        }
    }

    pub const fn in_cell(position: Vec2, cell: u32) -> Self {
        Self {
            position,
            cell: Some(cell),
        }
    }
}

/// Produces the next free position, or `None` when nothing fits right now.
pub trait PlacementStrategy {
    fn next_slot<R: Rng + ?Sized>(
        &mut self,
        active: &ActivePlacementSet,
        rng: &mut R,
    ) -> Option<Slot>;

    /// Forget any progress (e.g. after every entity was cleared).
    fn reset(&mut self) {}
}

/// The strategy chosen by configuration.
#[derive(Debug, Clone)]
pub enum Placement {
    Grid(GridPlacement),
    RandomRetry(RandomRetryPlacement),
}

impl Placement {
    /// Build the configured strategy over the padded play area.
    ///
    /// Expects a validated config.
    pub fn from_config(config: &PlacementConfig) -> Self {
        let area = config.bounds.padded(config.padding);
        match config.mode {
            PlacementMode::Grid => {
                Placement::Grid(GridPlacement::new(area, config.grid_width, config.grid_height))
            }
            PlacementMode::Random => {
                Placement::RandomRetry(RandomRetryPlacement::new(area, config.max_attempts))
            }
        }
    }

    pub fn mode(&self) -> PlacementMode {
        match self {
            Placement::Grid(_) => PlacementMode::Grid,
            Placement::RandomRetry(_) => PlacementMode::Random,
        }
    }
}

impl PlacementStrategy for Placement {
    fn next_slot<R: Rng + ?Sized>(
        &mut self,
        active: &ActivePlacementSet,
        rng: &mut R,
    ) -> Option<Slot> {
        match self {
            Placement::Grid(grid) => grid.next_slot(active, rng),
            Placement::RandomRetry(random) => random.next_slot(active, rng),
        }
    }

    fn reset(&mut self) {
        match self {
            Placement::Grid(grid) => grid.reset(),
            Placement::RandomRetry(random) => random.reset(),
        }
    }
}
