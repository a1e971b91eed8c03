pub mod returns;
pub mod sma;

pub use returns::calculate_log_returns;
pub use sma::calculate_sma;

/// Indicator values at a single bar, all defined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorValues {
    pub log_return: f64,
    pub sma_short: f64,
    pub sma_long: f64,
}

/// Pre-computed indicators for all bars
#[derive(Debug)]
pub struct IndicatorSeries {
    pub log_returns: Vec<Option<f64>>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Calculate all indicators from closing prices
    pub fn calculate(closes: &[f64], short_period: usize, long_period: usize) -> Self {
        Self {
            log_returns: calculate_log_returns(closes),
            sma_short: calculate_sma(closes, short_period),
            sma_long: calculate_sma(closes, long_period),
        }
    }

    /// Indicator values at `idx`, or `None` if any of them is still warming up
    pub fn get(&self, idx: usize) -> Option<IndicatorValues> {
        Some(IndicatorValues {
            log_return: self.log_returns.get(idx).copied().flatten()?,
            sma_short: self.sma_short.get(idx).copied().flatten()?,
            sma_long: self.sma_long.get(idx).copied().flatten()?,
        })
    }
}
