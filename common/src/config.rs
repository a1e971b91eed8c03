use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, Result};

/// Backtest parameters
///
/// A value of this type describes one backtest: which instrument, which two
/// moving-average windows, and which half-open date range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestParameters {
    pub symbol: String,
    /// Short moving-average window, in trading days
    pub sma_short: usize,
    /// Long moving-average window, in trading days
    pub sma_long: usize,
    /// First date included
    pub start: NaiveDate,
    /// First date excluded
    pub end: NaiveDate,
}

impl Default for BacktestParameters {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            sma_short: 20,
            sma_long: 50,
            start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

impl BacktestParameters {
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_windows(mut self, sma_short: usize, sma_long: usize) -> Self {
        self.sma_short = sma_short;
        self.sma_long = sma_long;
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Check the parameters describe a runnable backtest.
    ///
    /// Window ordering is deliberately not checked: `sma_short >= sma_long`
    /// is computed mechanically and the signal meaning is up to the caller.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(BacktestError::InvalidParameter(
                "symbol must not be empty".to_string(),
            ));
        }
        if self.sma_short == 0 || self.sma_long == 0 {
            return Err(BacktestError::InvalidParameter(format!(
                "moving-average windows must be positive (short={}, long={})",
                self.sma_short, self.sma_long
            )));
        }
        if self.start >= self.end {
            return Err(BacktestError::InvalidParameter(format!(
                "start date {} must be before end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Load parameters from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| BacktestError::DataLoadError(e.to_string()))?;
        let params: Self = serde_json::from_reader(BufReader::new(file))?;
        params.validate()?;
        Ok(params)
    }
}
