//! Randomness sources for the turn engine.
//!
//! The engine never touches a global generator; every draw goes through a
//! [`RandomSource`] handed to it at construction.

use rand::{seq::index, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// `count` distinct indices drawn from `0..population`.
    fn sample_without_replacement(&mut self, population: usize, count: usize) -> Vec<usize>;
    /// Uniform integer in `min..=max`.
    fn uniform_int(&mut self, min: u32, max: u32) -> u32;
    /// Uniform value in `[0, 100)`.
    fn uniform_percent(&mut self) -> f64;
}

/// ChaCha8-backed source; the same seed always replays the same run.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(42)
    }
}

impl RandomSource for SeededRandom {
    fn sample_without_replacement(&mut self, population: usize, count: usize) -> Vec<usize> {
        let count = count.min(population);
        index::sample(&mut self.inner, population, count).into_vec()
    }

    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max, "empty integer range {min}..={max}");
        self.inner.gen_range(min..=max)
    }

    fn uniform_percent(&mut self) -> f64 {
        self.inner.gen_range(0.0..100.0)
    }
}

/// Deterministic source for tests: always takes the first candidates, the
/// low end of integer ranges (or the high end with [`FixedRandom::picking_max`])
/// and a constant percent roll.
#[derive(Clone, Debug, Default)]
pub struct FixedRandom {
    percent: f64,
    pick_max: bool,
}

impl FixedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant roll returned by `uniform_percent`, kept inside `[0, 100)`.
    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = percent.clamp(0.0, 99.999_999);
        self
    }

    pub fn picking_max(mut self) -> Self {
        self.pick_max = true;
        self
    }
}

impl RandomSource for FixedRandom {
    fn sample_without_replacement(&mut self, population: usize, count: usize) -> Vec<usize> {
        (0..count.min(population)).collect()
    }

    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        if self.pick_max {
            max
        } else {
            min
        }
    }

    fn uniform_percent(&mut self) -> f64 {
        self.percent
    }
}
