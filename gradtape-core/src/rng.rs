//! Explicit random state for initialization and noise injection.
//!
//! There is no hidden global generator: every consumer of randomness
//! ([`Matrix::random`](crate::Matrix::random), [`Graph::gauss`](crate::Graph::gauss))
//! takes a `&mut NormalSampler`, so two samplers built from the same seed produce the
//! same stream and never interfere with each other.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Gaussian sample source owning its own generator state.
#[derive(Debug, Clone)]
pub struct NormalSampler {
    rng: StdRng,
}

impl NormalSampler {
    /// Creates a reproducible sampler from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draws one sample from `N(mu, std^2)`.
    pub fn sample(&mut self, mu: f64, std: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mu + z * std
    }

    /// Overwrites every element of `values` with a fresh `N(mu, std^2)` sample.
    pub fn fill(&mut self, values: &mut [f64], mu: f64, std: f64) {
        for v in values.iter_mut() {
            *v = self.sample(mu, std);
        }
    }
}

impl Default for NormalSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}
