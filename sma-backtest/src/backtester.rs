use common::{BacktestError, BacktestParameters, BacktestResult, PreparedSeries, PriceSeries, Result};
use tracing::info;

use crate::data::{fetch_prices, PriceSource};
use crate::engine::BacktestEngine;
use crate::prepare::prepare;
use crate::report::{ChartData, PerformanceReport};

/// One instrument's backtest session
///
/// Holds the fetched prices, the prepared series and the latest result for
/// a fixed set of parameters. Each stage is a call into the pure functions
/// in [`crate::prepare`] and [`crate::engine`].
#[derive(Debug, Clone)]
pub struct Backtester {
    params: BacktestParameters,
    prices: PriceSeries,
    prepared: PreparedSeries,
    result: Option<BacktestResult>,
}

impl Backtester {
    /// Fetch prices from `source` and prepare them
    pub fn new(params: BacktestParameters, source: &dyn PriceSource) -> Result<Self> {
        let prices = fetch_prices(source, &params)?;
        Self::from_prices(params, prices)
    }

    /// Prepare an already-fetched price series
    pub fn from_prices(params: BacktestParameters, prices: PriceSeries) -> Result<Self> {
        params.validate()?;
        if prices.is_empty() {
            return Err(BacktestError::NoData {
                symbol: params.symbol.clone(),
                start: params.start,
                end: params.end,
            });
        }
        let prepared = prepare(&prices, params.sma_short, params.sma_long)?;
        Ok(Self {
            params,
            prices,
            prepared,
            result: None,
        })
    }

    pub fn params(&self) -> &BacktestParameters {
        &self.params
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn prepared(&self) -> &PreparedSeries {
        &self.prepared
    }

    pub fn result(&self) -> Option<&BacktestResult> {
        self.result.as_ref()
    }

    /// Run the backtest, replacing any earlier result.
    ///
    /// Returns `(final_strategy_return, outperformance)`.
    pub fn run(&mut self) -> Result<(f64, f64)> {
        let result = BacktestEngine::run(&self.prepared)?;
        let performance = result.performance();
        self.result = Some(result);
        Ok(performance)
    }

    /// Change the moving-average windows, re-preparing the stored prices.
    ///
    /// Any earlier result is discarded. On error the session is unchanged.
    pub fn set_windows(&mut self, sma_short: usize, sma_long: usize) -> Result<()> {
        let params = self.params.clone().with_windows(sma_short, sma_long);
        params.validate()?;
        let prepared = prepare(&self.prices, sma_short, sma_long)?;

        info!(sma_short, sma_long, "reconfigured moving-average windows");
        self.params = params;
        self.prepared = prepared;
        self.result = None;
        Ok(())
    }

    /// Replace all parameters, re-fetching from `source` and re-preparing.
    ///
    /// On error the session is unchanged.
    pub fn reconfigure(&mut self, params: BacktestParameters, source: &dyn PriceSource) -> Result<()> {
        *self = Self::new(params, source)?;
        Ok(())
    }

    pub fn report(&self) -> Result<PerformanceReport> {
        let result = self.result.as_ref().ok_or(BacktestError::NotRun)?;
        Ok(PerformanceReport::new(&self.params, result))
    }

    pub fn chart(&self) -> Result<ChartData> {
        let result = self.result.as_ref().ok_or(BacktestError::NotRun)?;
        Ok(ChartData::new(&self.params, result))
    }
}
