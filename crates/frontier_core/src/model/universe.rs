//! The ordered set of assets a simulation runs over

use rustc_hash::FxHashMap;

use crate::error::StatisticsError;

/// Ordered asset identifiers (tickers), fixed for the run.
///
/// Column `i` of every vector and matrix in the crate refers to `tickers()[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUniverse {
    tickers: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl AssetUniverse {
    /// Create a universe, rejecting empty or duplicated ticker lists.
    pub fn new<I, S>(tickers: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tickers: Vec<String> = tickers.into_iter().map(Into::into).collect();
        if tickers.is_empty() {
            return Err(StatisticsError::EmptyUniverse);
        }

        let mut index = FxHashMap::default();
        for (i, ticker) in tickers.iter().enumerate() {
            if index.insert(ticker.clone(), i).is_some() {
                return Err(StatisticsError::DuplicateTicker(ticker.clone()));
            }
        }

        Ok(Self { tickers, index })
    }

    /// Number of assets (N)
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Always false for a constructed universe
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Column index of a ticker
    #[must_use]
    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.index.get(ticker).copied()
    }
}
