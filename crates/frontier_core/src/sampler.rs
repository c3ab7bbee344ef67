//! Random weight generation
//!
//! Weights are produced by drawing one non-negative value per asset and dividing by
//! the sum. With uniform draws (the reference scheme) this is *not* uniform over the
//! simplex for more than two assets; the bias is kept so output stays comparable
//! with reference runs. `WeightScheme::Dirichlet` is the unbiased alternative.

use rand::Rng;
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};

use crate::error::SampleError;

/// Distribution of the raw per-asset draws
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightScheme {
    /// Uniform on [0, 1), normalized by the sum
    #[default]
    NormalizedUniform,
    /// Exp(1) draws normalized by the sum, i.e. Dirichlet(1, ..., 1)
    Dirichlet,
}

/// Source of raw non-negative draws.
///
/// Modelled as an explicit stream so runs can be reproduced or scripted without
/// relying on process-wide random state.
pub trait DrawSource {
    /// Fill `draws` with non-negative values
    fn fill_draws(&mut self, draws: &mut [f64]);
}

impl<S: DrawSource + ?Sized> DrawSource for &mut S {
    fn fill_draws(&mut self, draws: &mut [f64]) {
        (**self).fill_draws(draws);
    }
}

/// Draws from a random number generator according to a [`WeightScheme`]
#[derive(Debug, Clone)]
pub struct RngDraws<R> {
    rng: R,
    scheme: WeightScheme,
}

impl<R: Rng> RngDraws<R> {
    #[must_use]
    pub fn new(rng: R, scheme: WeightScheme) -> Self {
        Self { rng, scheme }
    }

    /// Reference scheme: uniform draws on [0, 1)
    #[must_use]
    pub fn uniform(rng: R) -> Self {
        Self::new(rng, WeightScheme::NormalizedUniform)
    }
}

impl<R: Rng> DrawSource for RngDraws<R> {
    fn fill_draws(&mut self, draws: &mut [f64]) {
        match self.scheme {
            WeightScheme::NormalizedUniform => {
                for d in draws.iter_mut() {
                    *d = self.rng.random::<f64>();
                }
            }
            WeightScheme::Dirichlet => {
                for d in draws.iter_mut() {
                    *d = self.rng.sample(Exp1);
                }
            }
        }
    }
}

/// Draw one weight vector over `num_assets` assets.
///
/// Fails with [`SampleError::Degenerate`] when the draws sum to zero; callers retry.
pub fn sample_weights<S: DrawSource + ?Sized>(
    source: &mut S,
    num_assets: usize,
) -> Result<Vec<f64>, SampleError> {
    if num_assets == 0 {
        return Err(SampleError::NoAssets);
    }

    let mut weights = vec![0.0; num_assets];
    source.fill_draws(&mut weights);
    debug_assert!(weights.iter().all(|w| *w >= 0.0));

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(SampleError::Degenerate);
    }

    for w in &mut weights {
        *w /= total;
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Zeros;

    impl DrawSource for Zeros {
        fn fill_draws(&mut self, draws: &mut [f64]) {
            draws.fill(0.0);
        }
    }

    fn assert_on_simplex(weights: &[f64]) {
        assert!(weights.iter().all(|w| *w >= 0.0));
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() <= 1e-9, "weights sum to {total}");
    }

    #[test]
    fn test_uniform_weights_on_simplex() {
        let mut draws = RngDraws::uniform(SmallRng::seed_from_u64(42));
        for n in 1..=12 {
            for _ in 0..200 {
                let weights = sample_weights(&mut draws, n).unwrap();
                assert_eq!(weights.len(), n);
                assert_on_simplex(&weights);
            }
        }
    }

    #[test]
    fn test_dirichlet_weights_on_simplex() {
        let mut draws = RngDraws::new(SmallRng::seed_from_u64(7), WeightScheme::Dirichlet);
        for _ in 0..500 {
            assert_on_simplex(&sample_weights(&mut draws, 5).unwrap());
        }
    }

    #[test]
    fn test_single_asset_gets_full_weight() {
        let mut draws = RngDraws::uniform(SmallRng::seed_from_u64(3));
        for _ in 0..100 {
            assert_eq!(sample_weights(&mut draws, 1).unwrap(), vec![1.0]);
        }
    }

    #[test]
    fn test_all_zero_draws_are_degenerate() {
        assert_eq!(sample_weights(&mut Zeros, 3), Err(SampleError::Degenerate));
        assert_eq!(sample_weights(&mut Zeros, 0), Err(SampleError::NoAssets));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let mut a = RngDraws::uniform(SmallRng::seed_from_u64(99));
        let mut b = RngDraws::uniform(SmallRng::seed_from_u64(99));
        for _ in 0..50 {
            assert_eq!(
                sample_weights(&mut a, 4).unwrap(),
                sample_weights(&mut b, 4).unwrap()
            );
        }
    }
}
