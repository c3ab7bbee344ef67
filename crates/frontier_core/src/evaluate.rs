//! Portfolio evaluation: annualized return, volatility and Sharpe ratio
//!
//! All functions here are pure and read the shared statistics only, so they may be
//! called concurrently from independent trials.

use crate::config::SimulationConfig;
use crate::error::EvaluationError;
use crate::model::PortfolioSample;
use crate::statistics::ReturnStatistics;

/// Relative slack for round-off in `wᵗ Σ w` before a negative value counts as corrupt input
const VARIANCE_ROUNDOFF: f64 = 1e-12;

/// Daily portfolio variance `wᵗ Σ w`.
///
/// Round-off below `VARIANCE_ROUNDOFF` times the magnitude of the quadratic form is
/// reported as exactly zero. Anything more negative means the covariance matrix is
/// not positive semi-definite and fails with [`EvaluationError::NegativeVariance`].
pub fn portfolio_variance(
    weights: &[f64],
    stats: &ReturnStatistics,
) -> Result<f64, EvaluationError> {
    let n = stats.num_assets();
    if weights.len() != n {
        return Err(EvaluationError::DimensionMismatch {
            expected: n,
            found: weights.len(),
        });
    }

    let mut variance = 0.0;
    let mut magnitude = 0.0;
    for (i, row) in stats.covariance().iter().enumerate() {
        for (j, cov) in row.iter().enumerate() {
            let term = weights[i] * weights[j] * cov;
            variance += term;
            magnitude += term.abs();
        }
    }

    if variance >= 0.0 {
        Ok(variance)
    } else if variance >= -VARIANCE_ROUNDOFF * magnitude {
        Ok(0.0)
    } else {
        Err(EvaluationError::NegativeVariance { variance })
    }
}

/// Sharpe ratio `(return - risk_free_rate) / volatility`
pub fn sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> Result<f64, EvaluationError> {
    if annualized_volatility == 0.0 {
        return Err(EvaluationError::DegenerateVolatility);
    }
    Ok((annualized_return - risk_free_rate) / annualized_volatility)
}

/// Evaluate one weight vector.
///
/// A zero-volatility portfolio is still a valid sample; its Sharpe ratio is `None`
/// and selection skips it.
pub fn evaluate_portfolio(
    weights: Vec<f64>,
    stats: &ReturnStatistics,
    config: &SimulationConfig,
) -> Result<PortfolioSample, EvaluationError> {
    let variance = portfolio_variance(&weights, stats)?;

    let daily_return: f64 = weights
        .iter()
        .zip(stats.mean())
        .map(|(w, mu)| w * mu)
        .sum();

    let annualized_return = daily_return * config.trading_days;
    let annualized_volatility = variance.sqrt() * config.trading_days.sqrt();

    let sharpe_ratio =
        match sharpe_ratio(annualized_return, annualized_volatility, config.risk_free_rate) {
            Ok(ratio) => Some(ratio),
            Err(EvaluationError::DegenerateVolatility) => None,
            Err(e) => return Err(e),
        };

    Ok(PortfolioSample {
        weights,
        annualized_return,
        annualized_volatility,
        sharpe_ratio,
    })
}
