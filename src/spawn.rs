//! Spawn context for body initialization.
//!
//! Wraps a seedable RNG with the handful of sampling helpers the particle
//! field needs when it is (re)seeded.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random source used while laying out a fresh field.
///
/// ```ignore
/// let mut ctx = SpawnContext::from_seed(42);
/// let p = ctx.random_in_box(Vec3::new(5.0, 5.0, 2.0));
/// let r = ctx.random_range(0.5, 1.0);
/// ```
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Context seeded from the wall clock, different every run.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    /// Deterministic context for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Use `seed` when present, otherwise the clock.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_clock(),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 uniformly in `[min, max]`. Equal bounds return `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform point in the axis-aligned box `[-half, half]` on every axis.
    pub fn random_in_box(&mut self, half: Vec3) -> Vec3 {
        Vec3::new(
            self.random_range(-half.x, half.x),
            self.random_range(-half.y, half.y),
            self.random_range(-half.z, half.z),
        )
    }
}
