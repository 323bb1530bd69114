//! Play-area math
//!
//! Re-exports glam and adds the rectangle type that placement works in,
//! plus the seedable RNG every random decision is drawn from.

pub use glam::*;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// RNG used for spawn intervals and random placement.
pub type GameRng = ChaCha8Rng;

/// Build the game RNG, reproducible when a seed is given.
pub fn seeded_rng(seed: Option<u64>) -> GameRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True when the rectangle has no area (also catches NaN extents).
    pub fn is_empty(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0)
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Map a normalized `[0, 1]²` coordinate into the rectangle.
    #[inline]
    pub fn lerp(&self, t: Vec2) -> Vec2 {
        self.min + self.size() * t
    }

    /// Shrink each side by `padding`, expressed as a fraction of the extent.
    pub fn padded(&self, padding: Vec2) -> Bounds {
        Bounds {
            min: self.lerp(padding),
            max: self.lerp(Vec2::ONE - padding),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Uniform sample inside the rectangle.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Vec2::new(-5.0, -3.0), Vec2::new(5.0, 3.0))
    }
}
