//! Game configuration
//!
//! Plain serde structs with the shipped defaults. Every field has a
//! default, so a JSON file only needs the values it overrides.

use crate::error::ConfigError;
use crate::math::{Bounds, Vec2};
use crate::pool::PoolError;
use crate::placement::DEFAULT_MAX_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on `grid_width * grid_height`.
pub const MAX_GRID_CELLS: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub spawn: SpawnConfig,
    pub pickup: PickupConfig,
    pub pool: PoolConfig,
    pub placement: PlacementConfig,
    /// Fixed RNG seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Round length in seconds.
    pub duration: f32,
    pub base_point_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between spawn attempts, sampled uniformly from this range.
    pub min_interval: f32,
    pub max_interval: f32,
    pub max_on_screen: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Seconds a pickup stays before expiring on its own.
    pub lifetime: f32,
    /// Tap radius used by `Game::collect_at`.
    pub pick_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub initial_size: usize,
    pub max_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    Grid,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub mode: PlacementMode,
    pub min_distance: f32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub max_attempts: u32,
    /// Fraction of the play area kept clear on each side.
    pub padding: Vec2,
    pub bounds: Bounds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: 30.0,
            base_point_value: 1,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_interval: 1.0,
            max_interval: 2.0,
            max_on_screen: 5,
        }
    }
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            lifetime: 3.0,
            pick_radius: 0.5,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 10,
            max_size: 20,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: PlacementMode::Grid,
            min_distance: 1.5,
            grid_width: 5,
            grid_height: 4,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            padding: Vec2::splat(0.1),
            bounds: Bounds::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        tracing::info!(path = %path.as_ref().display(), "loaded game config");
        Ok(config)
    }

    /// Reject configurations that could never behave sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        seconds("session.duration", self.session.duration)?;
        seconds("spawn.min_interval", self.spawn.min_interval)?;
        seconds("spawn.max_interval", self.spawn.max_interval)?;
        seconds("pickup.lifetime", self.pickup.lifetime)?;
        non_negative("pickup.pick_radius", self.pickup.pick_radius)?;
        non_negative("placement.min_distance", self.placement.min_distance)?;

        if self.spawn.min_interval > self.spawn.max_interval {
            return Err(ConfigError::IntervalOrder {
                min: self.spawn.min_interval,
                max: self.spawn.max_interval,
            });
        }

        if self.pool.max_size < self.pool.initial_size {
            return Err(PoolError::CapacityBelowInitial {
                initial: self.pool.initial_size,
                max: self.pool.max_size,
            }
            .into());
        }

        self.placement.validate(self.spawn.max_on_screen)
    }
}

impl SpawnConfig {
    /// Interval range as durations. Only meaningful on a validated config.
    pub fn interval_range(&self) -> (Duration, Duration) {
        (
            Duration::from_secs_f32(self.min_interval),
            Duration::from_secs_f32(self.max_interval),
        )
    }
}

impl PlacementConfig {
    /// The rectangle entities are actually placed in.
    pub fn area(&self) -> Bounds {
        self.bounds.padded(self.padding)
    }

    /// Largest distance two placed entities can ever be apart: the farthest
    /// pair of cell centres in grid mode, the area diagonal otherwise.
    pub fn spread(&self) -> f32 {
        let area = self.area();
        match self.mode {
            PlacementMode::Grid => {
                let cells = Vec2::new(self.grid_width as f32, self.grid_height as f32);
                (area.size() * (cells - Vec2::ONE) / cells).length()
            }
            PlacementMode::Random => area.diagonal(),
        }
    }

    fn validate(&self, max_on_screen: usize) -> Result<(), ConfigError> {
        let padding_ok = |p: f32| (0.0..0.5).contains(&p);
        if !padding_ok(self.padding.x) || !padding_ok(self.padding.y) {
            return Err(ConfigError::Padding {
                x: self.padding.x,
                y: self.padding.y,
            });
        }

        let area = self.area();
        if area.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }

        match self.mode {
            PlacementMode::Grid if self.grid_width == 0 || self.grid_height == 0 => {
                return Err(ConfigError::EmptyGrid {
                    width: self.grid_width,
                    height: self.grid_height,
                });
            }
            PlacementMode::Grid => {
                let cells = self.grid_width.checked_mul(self.grid_height);
                if cells.map_or(true, |cells| cells > MAX_GRID_CELLS) {
                    return Err(ConfigError::GridTooLarge {
                        width: self.grid_width,
                        height: self.grid_height,
                        max: MAX_GRID_CELLS,
                    });
                }
            }
            PlacementMode::Random if self.max_attempts == 0 => {
                return Err(ConfigError::NoAttempts);
            }
            PlacementMode::Random => {}
        }

        let spread = self.spread();
        if max_on_screen > 1 && self.min_distance > spread {
            return Err(ConfigError::UnreachableSpacing {
                min_distance: self.min_distance,
                spread,
                max_on_screen,
            });
        }

        Ok(())
    }
}

/// A non-negative number of seconds that fits in a `Duration`.
fn seconds(field: &'static str, value: f32) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f32(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(ConfigError::InvalidValue { field, value }),
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}
