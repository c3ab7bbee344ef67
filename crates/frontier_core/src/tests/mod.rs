//! Scenario tests for the Monte Carlo portfolio engine
//!
//! Tests are organized by topic:
//! - `scenario` - Hand-computed end-to-end runs with scripted weight draws
//! - `properties` - Invariants that hold for every seeded run


use std::collections::VecDeque;

use crate::model::{AssetUniverse, ReturnSeries};
use crate::sampler::DrawSource;
use crate::statistics::ReturnStatistics;

/// Draw source that replays a fixed list of raw draws
pub(crate) struct ScriptedDraws {
    values: VecDeque<f64>,
}

impl ScriptedDraws {
    pub(crate) fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DrawSource for ScriptedDraws {
    fn fill_draws(&mut self, draws: &mut [f64]) {
        for d in draws.iter_mut() {
            *d = self
                .values
                .pop_front()
                .expect("scripted draws exhausted");
        }
    }
}

/// Statistics from day-major return rows
pub(crate) fn stats_from_rows(tickers: &[&str], rows: Vec<Vec<f64>>) -> ReturnStatistics {
    let universe = AssetUniverse::new(tickers.iter().copied()).unwrap();
    let series = ReturnSeries::new(universe, rows).unwrap();
    ReturnStatistics::from_series(&series).unwrap()
}
