//! Random draws used by the simulation, behind a swappable source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random draws.
pub trait NoiseSource: Send {
    /// Uniform real in `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `[low, high]`.
    fn integer(&mut self, low: i32, high: i32) -> i32;
}

/// Pseudo-random source backed by [`StdRng`].
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    /// Seeded for reproducibility, or from entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low.is_nan() || high.is_nan() || high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn integer(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Deterministic source that always lands at the same fraction of a range.
///
/// `FixedNoise::centered()` turns every symmetric jitter into zero.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise {
    fraction: f64,
}

impl FixedNoise {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn centered() -> Self {
        Self::new(0.5)
    }

    pub fn low() -> Self {
        Self::new(0.0)
    }

    pub fn high() -> Self {
        Self::new(1.0)
    }
}

impl NoiseSource for FixedNoise {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.fraction
    }

    fn integer(&mut self, low: i32, high: i32) -> i32 {
        let span = (high - low) as f64;
        low + (span * self.fraction).round() as i32
    }
}
