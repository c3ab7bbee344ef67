//! Extremal portfolio selection
//!
//! Ties are broken by trial order: the first sample reaching the extreme wins, so a
//! seeded run always reports the same portfolios. Zero-volatility samples have no
//! Sharpe ratio and are not candidates for either extreme.

use crate::error::SimulationError;
use crate::model::PortfolioSample;

/// Trial indices of the two reported portfolios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub max_sharpe: usize,
    pub min_volatility: usize,
}

/// Samples eligible for selection, paired with their trial index and Sharpe ratio
fn candidates(
    samples: &[PortfolioSample],
) -> impl Iterator<Item = (usize, f64, &PortfolioSample)> {
    samples.iter().enumerate().filter_map(|(i, sample)| {
        sample
            .sharpe_ratio
            .filter(|ratio| ratio.is_finite())
            .map(|ratio| (i, ratio, sample))
    })
}

/// Index of the sample with the highest Sharpe ratio.
///
/// Fails with [`SimulationError::EmptySampleSet`] when no sample has a defined ratio.
pub fn max_sharpe(samples: &[PortfolioSample]) -> Result<usize, SimulationError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, ratio, _) in candidates(samples) {
        match best {
            Some((_, highest)) if ratio <= highest => {}
            _ => best = Some((i, ratio)),
        }
    }

    best.map(|(i, _)| i).ok_or(SimulationError::EmptySampleSet)
}

/// Index of the sample with the lowest annualized volatility among samples with a
/// defined Sharpe ratio
pub fn min_volatility(samples: &[PortfolioSample]) -> Result<usize, SimulationError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, _, sample) in candidates(samples) {
        match best {
            Some((_, lowest)) if sample.annualized_volatility >= lowest => {}
            _ => best = Some((i, sample.annualized_volatility)),
        }
    }

    best.map(|(i, _)| i).ok_or(SimulationError::EmptySampleSet)
}

/// Select both extremal portfolios
pub fn select_extremes(samples: &[PortfolioSample]) -> Result<Extremes, SimulationError> {
    let min_volatility = min_volatility(samples)?;
    let max_sharpe = max_sharpe(samples)?;
    Ok(Extremes {
        max_sharpe,
        min_volatility,
    })
}
