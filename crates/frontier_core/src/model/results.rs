//! Simulation results
//!
//! Contains the per-trial portfolio samples and the terminal output of a
//! Monte Carlo run, including the two extremal portfolios.

use serde::{Deserialize, Serialize};

use super::universe::AssetUniverse;

/// One evaluated random allocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSample {
    /// Non-negative weights summing to 1, one per asset
    pub weights: Vec<f64>,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// `None` when volatility is zero and the ratio is undefined
    pub sharpe_ratio: Option<f64>,
}

impl PortfolioSample {
    /// Whether this sample is an extremal candidate (volatility is non-zero)
    #[must_use]
    pub fn has_finite_sharpe(&self) -> bool {
        self.sharpe_ratio.is_some_and(f64::is_finite)
    }

    /// Pair each weight with its ticker
    #[must_use]
    pub fn allocation<'a>(&self, universe: &'a AssetUniverse) -> Vec<(&'a str, f64)> {
        universe
            .tickers()
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
            .collect()
    }
}

/// A point on the sampled efficient-frontier envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Trial index of the sample this point came from
    pub trial: usize,
    pub annualized_volatility: f64,
    pub annualized_return: f64,
}

/// Complete results from a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// All samples in trial order
    pub samples: Vec<PortfolioSample>,
    /// Trial index of the maximum-Sharpe sample
    pub max_sharpe_index: usize,
    /// Trial index of the minimum-volatility sample
    pub min_volatility_index: usize,
    /// Master seed used to derive the per-batch random streams, if the run was seeded
    pub seed: Option<u64>,
}

impl SimulationResult {
    #[must_use]
    pub fn max_sharpe(&self) -> &PortfolioSample {
        &self.samples[self.max_sharpe_index]
    }

    #[must_use]
    pub fn min_volatility(&self) -> &PortfolioSample {
        &self.samples[self.min_volatility_index]
    }

    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Approximate the efficient frontier from the sample cloud.
    ///
    /// The sampled volatility range is split into `bins` equal-width buckets and the
    /// highest-return sample of each non-empty bucket is kept (first occurrence wins).
    /// Points are returned in increasing volatility-bucket order.
    #[must_use]
    pub fn frontier(&self, bins: usize) -> Vec<FrontierPoint> {
        if bins == 0 || self.samples.is_empty() {
            return Vec::new();
        }

        let (lo, hi) = self.samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), s| {
                (
                    lo.min(s.annualized_volatility),
                    hi.max(s.annualized_volatility),
                )
            },
        );
        let width = (hi - lo) / bins as f64;

        let mut best: Vec<Option<usize>> = vec![None; bins];
        for (trial, sample) in self.samples.iter().enumerate() {
            let bucket = if width > 0.0 {
                (((sample.annualized_volatility - lo) / width) as usize).min(bins - 1)
            } else {
                0
            };
            let replace = match best[bucket] {
                None => true,
                Some(current) => {
                    sample.annualized_return > self.samples[current].annualized_return
                }
            };
            if replace {
                best[bucket] = Some(trial);
            }
        }

        best.into_iter()
            .flatten()
            .map(|trial| {
                let sample = &self.samples[trial];
                FrontierPoint {
                    trial,
                    annualized_volatility: sample.annualized_volatility,
                    annualized_return: sample.annualized_return,
                }
            })
            .collect()
    }
}
