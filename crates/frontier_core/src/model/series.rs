//! Daily return series and the closing-price histories they are built from

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::universe::AssetUniverse;
use crate::error::StatisticsError;

/// Closing prices for one asset over the lookback window, in date order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub ticker: String,
    /// (date, closing price) pairs
    pub closes: Vec<(Date, f64)>,
}

impl PriceHistory {
    #[must_use]
    pub fn new(ticker: impl Into<String>, closes: Vec<(Date, f64)>) -> Self {
        Self {
            ticker: ticker.into(),
            closes,
        }
    }
}

/// Daily fractional price changes aligned by date.
///
/// `returns[day][asset]`; every row has exactly one column per asset in the
/// universe and contains only finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    universe: AssetUniverse,
    returns: Vec<Vec<f64>>,
}

impl ReturnSeries {
    /// Build a series from day-major rows.
    ///
    /// Rows containing a non-finite value are missing-data days and are dropped
    /// rather than interpolated.
    pub fn new(universe: AssetUniverse, rows: Vec<Vec<f64>>) -> Result<Self, StatisticsError> {
        let n_assets = universe.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != n_assets {
                return Err(StatisticsError::RowWidthMismatch {
                    row,
                    expected: n_assets,
                    found: values.len(),
                });
            }
        }

        let returns = rows
            .into_iter()
            .filter(|row| row.iter().all(|r| r.is_finite()))
            .collect();

        Ok(Self { universe, returns })
    }

    /// Compute daily returns `close[t] / close[t-1] - 1` from per-asset closing prices.
    ///
    /// All histories must cover the same dates in strictly increasing order; aligning
    /// them is the market-data provider's job.
    pub fn from_prices(histories: &[PriceHistory]) -> Result<Self, StatisticsError> {
        let universe = AssetUniverse::new(histories.iter().map(|h| h.ticker.clone()))?;

        for history in histories {
            for pair in history.closes.windows(2) {
                if pair[1].0 <= pair[0].0 {
                    return Err(StatisticsError::NonIncreasingDates {
                        ticker: history.ticker.clone(),
                        date: pair[1].0,
                    });
                }
            }
        }

        let reference = &histories[0].closes;
        for history in &histories[1..] {
            let aligned = history.closes.len() == reference.len()
                && history
                    .closes
                    .iter()
                    .zip(reference)
                    .all(|((a, _), (b, _))| a == b);
            if !aligned {
                return Err(StatisticsError::MisalignedPrices {
                    ticker: history.ticker.clone(),
                });
            }
        }

        let rows = (1..reference.len())
            .map(|t| {
                histories
                    .iter()
                    .map(|h| h.closes[t].1 / h.closes[t - 1].1 - 1.0)
                    .collect()
            })
            .collect();

        Self::new(universe, rows)
    }

    #[must_use]
    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// Number of aligned observations (L)
    #[must_use]
    pub fn observations(&self) -> usize {
        self.returns.len()
    }

    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.universe.len()
    }

    /// Day-major rows
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.returns
    }

    /// Iterate one asset's returns in date order
    pub fn column(&self, asset: usize) -> impl Iterator<Item = f64> + '_ {
        self.returns.iter().map(move |row| row[asset])
    }
}
