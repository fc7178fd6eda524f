// White noise source.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Broadband white noise in [-1, 1].
///
/// Seeded so voices render deterministically in tests; no settable
/// frequency. Allocation-free once constructed.
pub struct WhiteNoise {
    rng: SmallRng,
}

impl WhiteNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn process(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}
