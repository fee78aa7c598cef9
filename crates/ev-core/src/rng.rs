//! Deterministic simulation RNG.
//!
//! Exactly one `SimRng` exists per run, owned by the passenger controller.
//! Every stochastic decision (arrival thinning, destination choice, planned
//! stay) draws from it in a fixed order, so a given seed reproduces the
//! spawn sequence byte for byte.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG for all stochastic simulation decisions.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform sample in the half-open interval `(0, 1]`.
    ///
    /// The thinning sampler takes `ln` of these draws, so zero must be
    /// excluded.  `gen::<f64>()` yields `[0, 1)`; reflecting it gives `(0, 1]`.
    #[inline]
    pub fn uniform_open0(&mut self) -> f64 {
        1.0 - self.0.gen::<f64>()
    }
}
