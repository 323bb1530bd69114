use crate::pool::PoolError;
use thiserror::Error;

/// Configuration problems detected before a game is built.
///
/// These are the only hard failures in the core; everything that can go
/// wrong once a game is running (pool exhausted, no free position, repeated
/// start/stop, double release) is absorbed tick by tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("spawn interval is inverted: min {min}s > max {max}s")]
    IntervalOrder { min: f32, max: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("play area has no extent after padding")]
    EmptyBounds,

    #[error("padding ({x}, {y}) must lie in [0, 0.5) on both axes")]
    Padding { x: f32, y: f32 },

    #[error("grid placement needs at least one cell, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("grid of {width}x{height} cells exceeds the limit of {max} cells")]
    GridTooLarge { width: u32, height: u32, max: u32 },

    #[error("random placement needs at least one attempt per wake-up")]
    NoAttempts,

    /// `spread` is the farthest two entities can be placed apart: the
    /// outermost grid cell centres, or the area diagonal in random mode.
    #[error(
        "min distance {min_distance} exceeds the placement spread {spread}; \
         at most one of {max_on_screen} entities could ever be placed"
    )]
    UnreachableSpacing {
        min_distance: f32,
        spread: f32,
        max_on_screen: usize,
    },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
