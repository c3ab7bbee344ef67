//! Monte Carlo driver
//!
//! Runs K independent trials (draw weights, evaluate) and gathers the samples into a
//! buffer preallocated by trial index before extremal selection. Trials are grouped
//! into fixed-size batches; each batch owns a `SmallRng` whose seed is drawn in order
//! from a master generator, so a seeded run produces identical samples whether the
//! batches run sequentially or on the rayon pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::{SampleError, SimulationError};
use crate::evaluate::evaluate_portfolio;
use crate::model::{PortfolioSample, SimulationResult};
use crate::sampler::{DrawSource, RngDraws, sample_weights};
use crate::selection::select_extremes;
use crate::statistics::ReturnStatistics;

/// Progress tracking and cancellation for a Monte Carlo run.
///
/// A cancellation request is consumed by the run it aborts, so the same tracker can
/// drive a fresh run afterwards.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    /// Completed trials counter
    completed: Arc<AtomicUsize>,
    /// Requested trials
    total: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create from existing atomics (for embedding in a UI)
    #[must_use]
    pub fn from_atomics(
        completed: Arc<AtomicUsize>,
        total: Arc<AtomicUsize>,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            completed,
            total,
            cancelled,
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction of requested trials finished, in [0, 1]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    fn add(&self, trials: usize) {
        self.completed.fetch_add(trials, Ordering::Relaxed);
    }

    fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Request cancellation; running batches finish, pending ones are skipped
    ///
    /// The flag is cleared once the aborted run returns [`SimulationError::Incomplete`].
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn clear_cancel(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a single trial, retrying degenerate weight draws in place.
fn run_trial<S: DrawSource + ?Sized>(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
    source: &mut S,
    trial: usize,
) -> Result<PortfolioSample, SimulationError> {
    for attempt in 1..=config.max_sample_retries {
        match sample_weights(&mut *source, stats.num_assets()) {
            Ok(weights) => return Ok(evaluate_portfolio(weights, stats, config)?),
            Err(SampleError::Degenerate) => {
                tracing::debug!(trial, attempt, "Degenerate weight draw, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(SimulationError::RetryLimitExceeded {
        trial,
        attempts: config.max_sample_retries,
    })
}

/// Run `trials` trials sequentially against an injected draw source.
///
/// The returned vector holds exactly `trials` samples in trial order.
pub fn run_trials<S: DrawSource + ?Sized>(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
    source: &mut S,
    trials: usize,
) -> Result<Vec<PortfolioSample>, SimulationError> {
    config.validate()?;
    (0..trials)
        .map(|trial| run_trial(stats, config, &mut *source, trial))
        .collect()
}

/// Run `config.trials` trials against an injected draw source and select the extremes.
pub fn simulate_with_source<S: DrawSource + ?Sized>(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
    source: &mut S,
) -> Result<SimulationResult, SimulationError> {
    let samples = run_trials(stats, config, source, config.trials)?;
    finish(samples, None)
}

/// Run a seeded Monte Carlo simulation.
///
/// When `config.seed` is `None` a seed is drawn from the OS and recorded in the result.
pub fn monte_carlo_simulate(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    monte_carlo_simulate_with_progress(stats, config, &SimulationProgress::default())
}

/// Run a seeded Monte Carlo simulation, reporting progress and honouring cancellation.
///
/// A cancelled run returns [`SimulationError::Incomplete`]; partial sample sets are
/// never passed to selection.
pub fn monte_carlo_simulate_with_progress(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
    progress: &SimulationProgress,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);

    tracing::info!(
        trials = config.trials,
        assets = stats.num_assets(),
        seed = seed,
        "Starting Monte Carlo portfolio simulation"
    );

    let samples = generate_samples(stats, config, seed, progress)?;
    let result = finish(samples, Some(seed))?;

    tracing::info!(
        max_sharpe = result.max_sharpe().sharpe_ratio.unwrap_or(f64::NAN),
        min_volatility = result.min_volatility().annualized_volatility,
        "Monte Carlo portfolio simulation finished"
    );

    Ok(result)
}

fn finish(
    samples: Vec<PortfolioSample>,
    seed: Option<u64>,
) -> Result<SimulationResult, SimulationError> {
    let extremes = select_extremes(&samples).inspect_err(|_| {
        if !samples.is_empty() {
            tracing::warn!(
                samples = samples.len(),
                "Every sample has zero volatility; no sharpe ratio is defined"
            );
        }
    })?;

    Ok(SimulationResult {
        samples,
        max_sharpe_index: extremes.max_sharpe,
        min_volatility_index: extremes.min_volatility,
        seed,
    })
}

/// Fill a K-slot buffer with samples, one independent random stream per batch.
fn generate_samples(
    stats: &ReturnStatistics,
    config: &SimulationConfig,
    seed: u64,
    progress: &SimulationProgress,
) -> Result<Vec<PortfolioSample>, SimulationError> {
    let trials = config.trials;
    let batch_size = config.batch_size;
    let num_batches = trials.div_ceil(batch_size);

    let mut master = SmallRng::seed_from_u64(seed);
    let batch_seeds: Vec<u64> = (0..num_batches).map(|_| master.next_u64()).collect();

    let mut samples = vec![PortfolioSample::default(); trials];
    progress.reset(trials);

    let run_batch =
        |(batch, chunk): (usize, &mut [PortfolioSample])| -> Result<(), SimulationError> {
            if progress.is_cancelled() {
                return Err(SimulationError::Incomplete {
                    completed: progress.completed(),
                    requested: trials,
                });
            }

            let rng = SmallRng::seed_from_u64(batch_seeds[batch]);
            let mut draws = RngDraws::new(rng, config.weight_scheme);
            let first_trial = batch * batch_size;
            for (offset, slot) in chunk.iter_mut().enumerate() {
                *slot = run_trial(stats, config, &mut draws, first_trial + offset)?;
            }

            progress.add(chunk.len());
            Ok(())
        };

    #[cfg(feature = "parallel")]
    let outcome = samples
        .par_chunks_mut(batch_size)
        .enumerate()
        .try_for_each(run_batch);
    #[cfg(not(feature = "parallel"))]
    let outcome = samples
        .chunks_mut(batch_size)
        .enumerate()
        .try_for_each(run_batch);

    match outcome {
        Ok(()) => Ok(samples),
        Err(SimulationError::Incomplete { requested, .. }) => {
            let completed = progress.completed();
            progress.clear_cancel();
            tracing::warn!(completed, requested, "Monte Carlo simulation cancelled");
            Err(SimulationError::Incomplete {
                completed,
                requested,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetUniverse;

    fn three_asset_stats() -> ReturnStatistics {
        ReturnStatistics::new(
            AssetUniverse::new(["A", "B", "C"]).unwrap(),
            vec![0.0008, 0.0004, 0.0002],
            vec![
                vec![0.00040, 0.00010, 0.00002],
                vec![0.00010, 0.00020, 0.00001],
                vec![0.00002, 0.00001, 0.00005],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_produces_exactly_k_samples() {
        let stats = three_asset_stats();
        for trials in [1, 99, 100, 101, 1000] {
            let config = SimulationConfig::seeded(5).with_trials(trials);
            let result = monte_carlo_simulate(&stats, &config).unwrap();
            assert_eq!(result.num_samples(), trials);
            assert_eq!(result.seed, Some(5));
        }
    }

    #[test]
    fn test_zero_trials_is_empty_sample_set() {
        let config = SimulationConfig::seeded(5).with_trials(0);
        assert_eq!(
            monte_carlo_simulate(&three_asset_stats(), &config),
            Err(SimulationError::EmptySampleSet)
        );
    }

    #[test]
    fn test_cancelled_run_is_incomplete() {
        let progress = SimulationProgress::new();
        progress.cancel();

        let config = SimulationConfig::seeded(5).with_trials(500);
        let err = monte_carlo_simulate_with_progress(&three_asset_stats(), &config, &progress)
            .unwrap_err();

        assert_eq!(
            err,
            SimulationError::Incomplete {
                completed: 0,
                requested: 500
            }
        );
    }

    #[test]
    fn test_tracker_is_reusable_after_cancel() {
        let stats = three_asset_stats();
        let config = SimulationConfig::seeded(5).with_trials(300);
        let progress = SimulationProgress::new();

        progress.cancel();
        assert!(matches!(
            monte_carlo_simulate_with_progress(&stats, &config, &progress),
            Err(SimulationError::Incomplete { .. })
        ));
        assert!(!progress.is_cancelled());

        let result = monte_carlo_simulate_with_progress(&stats, &config, &progress).unwrap();
        assert_eq!(result.num_samples(), 300);
        assert_eq!(progress.completed(), 300);
    }

    #[test]
    fn test_external_atomics_track_the_run() {
        let completed = Arc::new(AtomicUsize::new(0));
        let total = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicBool::new(false));
        let progress = SimulationProgress::from_atomics(
            Arc::clone(&completed),
            Arc::clone(&total),
            Arc::clone(&cancelled),
        );

        let config = SimulationConfig::seeded(3).with_trials(120);
        monte_carlo_simulate_with_progress(&three_asset_stats(), &config, &progress).unwrap();
        assert_eq!(completed.load(Ordering::Relaxed), 120);
        assert_eq!(total.load(Ordering::Relaxed), 120);

        cancelled.store(true, Ordering::Relaxed);
        assert!(progress.is_cancelled());
        assert!(matches!(
            monte_carlo_simulate_with_progress(&three_asset_stats(), &config, &progress),
            Err(SimulationError::Incomplete { completed: 0, requested: 120 })
        ));
        assert!(!cancelled.load(Ordering::Relaxed));
    }

    #[test]
    fn test_progress_reaches_total() {
        let progress = SimulationProgress::new();
        let config = SimulationConfig::seeded(11).with_trials(250);
        monte_carlo_simulate_with_progress(&three_asset_stats(), &config, &progress).unwrap();

        assert_eq!(progress.completed(), 250);
        assert_eq!(progress.total(), 250);
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_sampling() {
        let config = SimulationConfig {
            batch_size: 0,
            ..SimulationConfig::seeded(1)
        };
        assert!(matches!(
            monte_carlo_simulate(&three_asset_stats(), &config),
            Err(SimulationError::Config(_))
        ));
    }
}
