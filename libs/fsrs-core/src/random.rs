//! Random sources used for interval fuzzing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed of the default generator.
pub const DEFAULT_SEED: u64 = 42;

/// A stream of uniform values in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Deterministic ChaCha8 generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}
