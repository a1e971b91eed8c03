use common::{BacktestError, PreparedRow, PreparedSeries, PriceSeries, Result};
use tracing::debug;

use crate::indicators::IndicatorSeries;

/// Number of input prices consumed before the first fully-defined row.
///
/// The log return needs one prior price, so even with both windows at 1 the
/// first row is dropped.
pub fn warmup_rows(sma_short: usize, sma_long: usize) -> usize {
    sma_short.max(sma_long).max(2)
}

/// Compute log returns and both moving averages, dropping leading rows
/// where any of them is undefined.
///
/// Window ordering is not checked. Fails with `InsufficientData` when no
/// row survives, including for an empty input.
pub fn prepare(prices: &PriceSeries, sma_short: usize, sma_long: usize) -> Result<PreparedSeries> {
    if sma_short == 0 || sma_long == 0 {
        return Err(BacktestError::InvalidParameter(format!(
            "moving-average windows must be positive (short={}, long={})",
            sma_short, sma_long
        )));
    }

    let closes = prices.closes();
    let indicators = IndicatorSeries::calculate(&closes, sma_short, sma_long);

    let rows: Vec<PreparedRow> = prices
        .points()
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            indicators.get(i).map(|values| PreparedRow {
                date: point.date,
                close: point.close,
                log_return: values.log_return,
                sma_short: values.sma_short,
                sma_long: values.sma_long,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(BacktestError::InsufficientData {
            required: warmup_rows(sma_short, sma_long),
            actual: prices.len(),
        });
    }

    debug!(
        input = prices.len(),
        prepared = rows.len(),
        sma_short,
        sma_long,
        "prepared price series"
    );

    Ok(PreparedSeries {
        sma_short_window: sma_short,
        sma_long_window: sma_long,
        rows,
    })
}
