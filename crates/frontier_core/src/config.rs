//! Simulation configuration
//!
//! `SimulationConfig` carries every tunable of a Monte Carlo run. All fields have
//! serde defaults, so a partial document such as `{"trials": 5000, "seed": 7}`
//! deserializes into a complete configuration.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::sampler::WeightScheme;

fn default_trials() -> usize {
    20_000
}

fn default_trading_days() -> f64 {
    252.0
}

fn default_batch_size() -> usize {
    100
}

fn default_max_sample_retries() -> usize {
    64
}

/// Complete configuration for a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of random portfolios to sample (K)
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Trading periods per year used to annualize daily statistics (T)
    #[serde(default = "default_trading_days")]
    pub trading_days: f64,

    /// Annual risk-free rate subtracted from the return in the Sharpe ratio
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Master seed; `None` draws a fresh seed from the OS
    #[serde(default)]
    pub seed: Option<u64>,

    /// Trials per independent random stream
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Consecutive degenerate draws tolerated for a single trial
    #[serde(default = "default_max_sample_retries")]
    pub max_sample_retries: usize,

    /// How raw weight draws are generated before normalization
    #[serde(default)]
    pub weight_scheme: WeightScheme,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            trading_days: default_trading_days(),
            risk_free_rate: 0.0,
            seed: None,
            batch_size: default_batch_size(),
            max_sample_retries: default_max_sample_retries(),
            weight_scheme: WeightScheme::default(),
        }
    }
}

impl SimulationConfig {
    /// Config with a fixed seed and otherwise default values
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Check the configuration before any sampling happens.
    ///
    /// A trial count of zero is accepted here; selection reports the empty sample set.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.trading_days.is_finite() && self.trading_days > 0.0) {
            return Err(SimulationError::Config(format!(
                "trading_days must be positive and finite, got {}",
                self.trading_days
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(SimulationError::Config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(SimulationError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.max_sample_retries == 0 {
            return Err(SimulationError::Config(
                "max_sample_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
