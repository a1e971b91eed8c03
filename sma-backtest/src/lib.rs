pub mod backtester;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod prepare;
pub mod report;
pub mod signals;

pub use backtester::Backtester;
pub use data::{fetch_prices, load_file, FileSource, PriceSource, SyntheticConfig, SyntheticSource};
pub use engine::BacktestEngine;
pub use metrics::MetricsCalculator;
pub use prepare::prepare;
pub use report::{ChartData, ChartPoint, PerformanceReport};
pub use signals::SignalGenerator;

// Re-export common types
pub use common::{
    BacktestError, BacktestParameters, BacktestResult, Position, PreparedRow, PreparedSeries,
    PricePoint, PriceSeries, Result, ResultRow,
};
