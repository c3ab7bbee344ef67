//! Per-asset return statistics
//!
//! Turns an aligned [`ReturnSeries`] into the mean vector and sample covariance
//! matrix every Monte Carlo trial reads from. Statistics are computed once per run
//! and never mutated afterwards.

use crate::error::StatisticsError;
use crate::model::{AssetUniverse, ReturnSeries};

/// Mean daily returns and their sample covariance
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatistics {
    universe: AssetUniverse,
    mean: Vec<f64>,
    /// Row-major N×N matrix
    covariance: Vec<Vec<f64>>,
}

impl ReturnStatistics {
    /// Compute arithmetic means and the unbiased (L−1) sample covariance.
    ///
    /// Fails with [`StatisticsError::InsufficientData`] when fewer than two aligned
    /// observations are available.
    pub fn from_series(series: &ReturnSeries) -> Result<Self, StatisticsError> {
        let n_obs = series.observations();
        if n_obs < 2 {
            return Err(StatisticsError::InsufficientData {
                observations: n_obs,
            });
        }

        let n_assets = series.num_assets();
        let count = n_obs as f64;

        let mean: Vec<f64> = (0..n_assets)
            .map(|i| series.column(i).sum::<f64>() / count)
            .collect();

        let mut covariance = vec![vec![0.0; n_assets]; n_assets];
        for i in 0..n_assets {
            for j in i..n_assets {
                let cov = series
                    .rows()
                    .iter()
                    .map(|row| (row[i] - mean[i]) * (row[j] - mean[j]))
                    .sum::<f64>()
                    / (count - 1.0);
                // Mirror so the matrix is exactly symmetric
                covariance[i][j] = cov;
                covariance[j][i] = cov;
            }
        }

        Ok(Self {
            universe: series.universe().clone(),
            mean,
            covariance,
        })
    }

    /// Use statistics estimated elsewhere.
    ///
    /// Dimensions, finiteness and symmetry are checked; positive semi-definiteness is
    /// not, and a violation surfaces when a portfolio is evaluated.
    pub fn new(
        universe: AssetUniverse,
        mean: Vec<f64>,
        covariance: Vec<Vec<f64>>,
    ) -> Result<Self, StatisticsError> {
        let n = universe.len();
        if mean.len() != n {
            return Err(StatisticsError::DimensionMismatch {
                expected: n,
                found: mean.len(),
            });
        }
        if covariance.len() != n {
            return Err(StatisticsError::DimensionMismatch {
                expected: n,
                found: covariance.len(),
            });
        }
        if let Some(row) = covariance.iter().find(|row| row.len() != n) {
            return Err(StatisticsError::DimensionMismatch {
                expected: n,
                found: row.len(),
            });
        }

        let all_finite = mean.iter().all(|m| m.is_finite())
            && covariance.iter().flatten().all(|c| c.is_finite());
        if !all_finite {
            return Err(StatisticsError::NonFinite);
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (covariance[i][j], covariance[j][i]);
                if (a - b).abs() > 1e-12 * a.abs().max(b.abs()) {
                    return Err(StatisticsError::AsymmetricCovariance { row: i, col: j });
                }
            }
        }

        Ok(Self {
            universe,
            mean,
            covariance,
        })
    }

    #[must_use]
    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.mean.len()
    }

    /// Mean daily return per asset
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[must_use]
    pub fn covariance(&self) -> &[Vec<f64>] {
        &self.covariance
    }

    /// Daily variance of one asset
    #[must_use]
    pub fn variance(&self, asset: usize) -> f64 {
        self.covariance[asset][asset]
    }

    /// Pearson correlation matrix derived from the covariance.
    ///
    /// An asset with zero variance is uncorrelated with every other asset.
    #[must_use]
    pub fn correlation_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.num_assets();
        let std_devs: Vec<f64> = (0..n).map(|i| self.variance(i).max(0.0).sqrt()).collect();

        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else if std_devs[i] == 0.0 || std_devs[j] == 0.0 {
                            0.0
                        } else {
                            (self.covariance[i][j] / (std_devs[i] * std_devs[j]))
                                .clamp(-1.0, 1.0)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_asset_series() -> ReturnSeries {
        let universe = AssetUniverse::new(["A", "B"]).unwrap();
        ReturnSeries::new(
            universe,
            vec![vec![0.01, 0.02], vec![-0.01, -0.02], vec![0.02, 0.01]],
        )
        .unwrap()
    }

    #[test]
    fn test_mean_and_sample_covariance() {
        let stats = ReturnStatistics::from_series(&two_asset_series()).unwrap();

        assert!((stats.mean()[0] - 0.02 / 3.0).abs() < 1e-15);
        assert!((stats.mean()[1] - 0.01 / 3.0).abs() < 1e-15);

        // Deviations are [1, -5, 4]/300 and [5, -7, 2]/300, divided by L-1 = 2
        assert!((stats.variance(0) - 42.0 / 180_000.0).abs() < 1e-15);
        assert!((stats.variance(1) - 78.0 / 180_000.0).abs() < 1e-15);
        assert!((stats.covariance()[0][1] - 48.0 / 180_000.0).abs() < 1e-15);
        assert_eq!(stats.covariance()[0][1], stats.covariance()[1][0]);
    }

    #[test]
    fn test_builder_is_idempotent() {
        let series = two_asset_series();
        let first = ReturnStatistics::from_series(&series).unwrap();
        let second = ReturnStatistics::from_series(&series).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_observation_is_insufficient() {
        let universe = AssetUniverse::new(["A"]).unwrap();
        let series = ReturnSeries::new(universe, vec![vec![0.01]]).unwrap();
        assert_eq!(
            ReturnStatistics::from_series(&series),
            Err(StatisticsError::InsufficientData { observations: 1 })
        );
    }

    #[test]
    fn test_correlation_matrix() {
        let universe = AssetUniverse::new(["A", "B", "C"]).unwrap();
        let series = ReturnSeries::new(
            universe,
            vec![
                vec![0.01, -0.02, 0.0],
                vec![0.03, -0.06, 0.0],
                vec![-0.02, 0.04, 0.0],
            ],
        )
        .unwrap();
        let stats = ReturnStatistics::from_series(&series).unwrap();
        let corr = stats.correlation_matrix();

        assert!((corr[0][1] + 1.0).abs() < 1e-12);
        assert_eq!(corr[0][2], 0.0);
        assert_eq!(corr[2][2], 1.0);
    }

    #[test]
    fn test_new_validates_inputs() {
        let universe = AssetUniverse::new(["A", "B"]).unwrap();

        assert_eq!(
            ReturnStatistics::new(universe.clone(), vec![0.0], vec![]),
            Err(StatisticsError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            ReturnStatistics::new(
                universe.clone(),
                vec![0.0, 0.0],
                vec![vec![1.0, 0.5], vec![0.4, 1.0]]
            ),
            Err(StatisticsError::AsymmetricCovariance { row: 0, col: 1 })
        );
        assert_eq!(
            ReturnStatistics::new(
                universe.clone(),
                vec![f64::NAN, 0.0],
                vec![vec![1.0, 0.5], vec![0.5, 1.0]]
            ),
            Err(StatisticsError::NonFinite)
        );
        assert!(
            ReturnStatistics::new(universe, vec![0.0, 0.0], vec![vec![1.0, 0.5], vec![0.5, 1.0]])
                .is_ok()
        );
    }
}
