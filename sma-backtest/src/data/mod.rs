pub mod loader;
pub mod synthetic;

pub use loader::{load_csv, load_json};
pub use synthetic::{generate_synthetic_prices, SyntheticConfig};

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use common::{BacktestError, BacktestParameters, PriceSeries, Result};
use tracing::info;

/// Source of historical closing prices for one symbol
pub trait PriceSource {
    /// Closing prices for `symbol` over `[start, end)`
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Load prices from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<PriceSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(BacktestError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}

/// Prices read from a local CSV or JSON file holding a single symbol
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PriceSource for FileSource {
    fn fetch(&self, _symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let series = load_file(&self.path)?;
        let in_range = series
            .points()
            .iter()
            .filter(|p| p.date >= start && p.date < end)
            .copied()
            .collect();
        PriceSeries::new(in_range)
    }
}

/// Seeded random-walk prices, for running without market data
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    config: SyntheticConfig,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }
}

impl PriceSource for SyntheticSource {
    fn fetch(&self, _symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        generate_synthetic_prices(&self.config, start, end)
    }
}

/// Fetch the price series described by `params`, failing with `NoData`
/// when the source has nothing for that symbol and range.
pub fn fetch_prices(source: &dyn PriceSource, params: &BacktestParameters) -> Result<PriceSeries> {
    params.validate()?;

    let series = source.fetch(&params.symbol, params.start, params.end)?;
    if series.is_empty() {
        return Err(BacktestError::NoData {
            symbol: params.symbol.clone(),
            start: params.start,
            end: params.end,
        });
    }

    info!(
        symbol = %params.symbol,
        prices = series.len(),
        start = %params.start,
        end = %params.end,
        "fetched price series"
    );
    Ok(series)
}
