use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("No data for {symbol} between {start} and {end}. Check symbol or date range.")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Insufficient data: need at least {required} prices, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Backtest produced no rows: prepared series is empty")]
    EmptyResult,

    #[error("Backtest has not been run yet")]
    NotRun,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BacktestError>;
