use std::fmt;

use jiff::civil::Date;

/// Errors raised while building return series or return statistics
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticsError {
    /// The asset universe has no assets
    EmptyUniverse,
    /// The same ticker appears more than once in the universe
    DuplicateTicker(String),
    /// Fewer than two aligned observations remain, so sample covariance is undefined
    InsufficientData { observations: usize },
    /// A return row does not have one column per asset
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Price histories do not cover the same dates
    MisalignedPrices { ticker: String },
    /// Price dates are not strictly increasing
    NonIncreasingDates { ticker: String, date: Date },
    /// Supplied mean vector / covariance matrix dimensions disagree
    DimensionMismatch { expected: usize, found: usize },
    /// Supplied covariance matrix is not symmetric
    AsymmetricCovariance { row: usize, col: usize },
    /// Supplied statistics contain NaN or infinite values
    NonFinite,
}

impl fmt::Display for StatisticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticsError::EmptyUniverse => write!(f, "asset universe is empty"),
            StatisticsError::DuplicateTicker(ticker) => {
                write!(f, "ticker {ticker} appears more than once")
            }
            StatisticsError::InsufficientData { observations } => write!(
                f,
                "insufficient data: {observations} aligned observation(s), at least 2 required"
            ),
            StatisticsError::RowWidthMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "return row {row} has {found} column(s), expected {expected}"
            ),
            StatisticsError::MisalignedPrices { ticker } => {
                write!(f, "price dates for {ticker} are not aligned with the universe")
            }
            StatisticsError::NonIncreasingDates { ticker, date } => {
                write!(f, "price dates for {ticker} are not increasing at {date}")
            }
            StatisticsError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            StatisticsError::AsymmetricCovariance { row, col } => {
                write!(f, "covariance matrix is not symmetric at ({row}, {col})")
            }
            StatisticsError::NonFinite => write!(f, "statistics contain non-finite values"),
        }
    }
}

impl std::error::Error for StatisticsError {}

/// Errors from a single weight draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// Every raw draw was zero, so the weights cannot be normalized
    Degenerate,
    /// A weight vector over zero assets was requested
    NoAssets,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Degenerate => write!(f, "all weight draws were zero"),
            SampleError::NoAssets => write!(f, "cannot sample weights over zero assets"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Errors from evaluating a single portfolio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationError {
    /// Volatility is exactly zero, so the Sharpe ratio is undefined
    DegenerateVolatility,
    /// The quadratic form `wᵗ Σ w` came out negative; the covariance input is corrupt
    NegativeVariance { variance: f64 },
    /// Weight vector length does not match the statistics
    DimensionMismatch { expected: usize, found: usize },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::DegenerateVolatility => {
                write!(f, "portfolio volatility is zero; sharpe ratio undefined")
            }
            EvaluationError::NegativeVariance { variance } => write!(
                f,
                "portfolio variance {variance} is negative; covariance matrix is invalid"
            ),
            EvaluationError::DimensionMismatch { expected, found } => write!(
                f,
                "weight vector has {found} component(s), expected {expected}"
            ),
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Errors surfaced by a Monte Carlo run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Statistics(StatisticsError),
    Evaluation(EvaluationError),
    Sample(SampleError),
    /// There are no samples to select from, either none were produced or every
    /// sample had zero volatility
    EmptySampleSet,
    /// The run was cancelled before all trials completed
    Incomplete { completed: usize, requested: usize },
    /// The draw source kept producing degenerate draws
    RetryLimitExceeded { trial: usize, attempts: usize },
    /// Configuration error
    Config(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Statistics(e) => write!(f, "{e}"),
            SimulationError::Evaluation(e) => write!(f, "{e}"),
            SimulationError::Sample(e) => write!(f, "{e}"),
            SimulationError::EmptySampleSet => write!(f, "no samples to select from"),
            SimulationError::Incomplete {
                completed,
                requested,
            } => write!(
                f,
                "simulation incomplete: {completed} of {requested} trials finished"
            ),
            SimulationError::RetryLimitExceeded { trial, attempts } => write!(
                f,
                "trial {trial} produced degenerate weights {attempts} times in a row"
            ),
            SimulationError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Statistics(e) => Some(e),
            SimulationError::Evaluation(e) => Some(e),
            SimulationError::Sample(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StatisticsError> for SimulationError {
    fn from(err: StatisticsError) -> Self {
        SimulationError::Statistics(err)
    }
}

impl From<EvaluationError> for SimulationError {
    fn from(err: EvaluationError) -> Self {
        SimulationError::Evaluation(err)
    }
}

impl From<SampleError> for SimulationError {
    fn from(err: SampleError) -> Self {
        SimulationError::Sample(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
