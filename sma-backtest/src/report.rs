use std::fmt;
use std::io::Write;

use chrono::NaiveDate;
use common::{BacktestError, BacktestParameters, BacktestResult, Result};
use serde::{Deserialize, Serialize};

/// Summary of one backtest run, independent of how it is displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub symbol: String,
    pub sma_short: usize,
    pub sma_long: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trading_days: usize,
    pub strategy_return: f64,
    pub benchmark_return: f64,
    pub outperformance: f64,
}

impl PerformanceReport {
    pub fn new(params: &BacktestParameters, result: &BacktestResult) -> Self {
        Self {
            symbol: params.symbol.clone(),
            sma_short: params.sma_short,
            sma_long: params.sma_long,
            start_date: result.start_date,
            end_date: result.end_date,
            trading_days: result.rows.len(),
            strategy_return: result.strategy_return,
            benchmark_return: result.benchmark_return,
            outperformance: result.outperformance,
        }
    }

    /// Three-line plain-text summary
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy return: {:.6}", self.strategy_return)?;
        writeln!(f, "Buy & Hold return: {:.6}", self.benchmark_return)?;
        write!(f, "Outperformance: {:.6}", self.outperformance)
    }
}

/// Point on both cumulative-return curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub returns_bh: f64,
    pub returns_strategy: f64,
}

/// Everything a plotting front end needs to draw strategy vs buy-and-hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn new(params: &BacktestParameters, result: &BacktestResult) -> Self {
        Self {
            title: format!(
                "{} | SMA Short = {}, SMA Long = {}",
                params.symbol, params.sma_short, params.sma_long
            ),
            x_label: "Date".to_string(),
            y_label: "Cumulative Returns".to_string(),
            points: result
                .rows
                .iter()
                .map(|row| ChartPoint {
                    date: row.date,
                    returns_bh: row.cumulative_benchmark,
                    returns_strategy: row.cumulative_strategy,
                })
                .collect(),
        }
    }

    /// Write the curves as CSV with a `date,returns_bh,returns_strategy` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for point in &self.points {
            csv_writer
                .serialize(point)
                .map_err(|e| BacktestError::CsvError(e.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
