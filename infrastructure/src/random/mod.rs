//! Random source backed by `rand`

use legion_application::ports::random::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded from the OS, or from a fixed seed for reproducible sessions
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fixed seed when given, OS entropy otherwise
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl RandomSource for StdRandom {
    fn roll_percent(&mut self) -> f64 {
        self.rng.random_range(0.0..100.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}
