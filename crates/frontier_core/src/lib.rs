//! Monte Carlo portfolio simulation library
//!
//! This crate estimates the risk/return tradeoff of a fixed basket of assets by
//! sampling random allocations over the weight simplex. It supports:
//! - Return statistics (mean vector, sample covariance, correlation) from aligned
//!   daily returns or closing-price histories
//! - Random weight generation from an injectable, seedable draw stream
//! - Annualized return, volatility and Sharpe ratio per sampled portfolio
//! - Parallel, reproducible Monte Carlo runs with progress and cancellation
//! - Selection of the maximum-Sharpe and minimum-volatility portfolios
//!
//! # Example
//!
//! ```ignore
//! use frontier_core::{ReturnSeries, ReturnStatistics, SimulationConfig, monte_carlo_simulate};
//!
//! let series = ReturnSeries::from_prices(&histories)?;
//! let stats = ReturnStatistics::from_series(&series)?;
//! let result = monte_carlo_simulate(&stats, &SimulationConfig::seeded(42))?;
//!
//! for (ticker, weight) in result.max_sharpe().allocation(stats.universe()) {
//!     println!("{ticker}: {:.1}%", weight * 100.0);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod config;
pub mod error;
pub mod evaluate;
pub mod sampler;
pub mod selection;
pub mod simulation;
pub mod statistics;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SimulationConfig;
pub use error::{EvaluationError, SampleError, SimulationError, StatisticsError};
pub use model::{
    AssetUniverse, FrontierPoint, PortfolioSample, PriceHistory, ReturnSeries, SimulationResult,
};
pub use sampler::{DrawSource, RngDraws, WeightScheme};
pub use simulation::{
    SimulationProgress, monte_carlo_simulate, monte_carlo_simulate_with_progress, run_trials,
    simulate_with_source,
};
pub use statistics::ReturnStatistics;
