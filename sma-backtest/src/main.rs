use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sma_backtest::{
    BacktestParameters, Backtester, FileSource, PriceSource, SyntheticConfig, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "sma-backtest")]
#[command(version = "0.1.0")]
#[command(about = "SMA crossover backtest against buy-and-hold", long_about = None)]
struct Args {
    /// JSON parameter file; individual flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Symbol to backtest
    #[arg(short, long)]
    symbol: Option<String>,

    /// Short SMA window
    #[arg(long)]
    sma_short: Option<usize>,

    /// Long SMA window
    #[arg(long)]
    sma_long: Option<usize>,

    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// First date excluded (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Price file (CSV/JSON). If not provided, uses synthetic data.
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// Initial price for synthetic data
    #[arg(long, default_value = "100.0")]
    initial_price: f64,

    /// Random seed for synthetic data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Write the cumulative return curves to this CSV file
    #[arg(long)]
    chart_csv: Option<PathBuf>,
}

impl Args {
    fn parameters(&self) -> Result<BacktestParameters> {
        let mut params = match &self.config {
            Some(path) => BacktestParameters::from_json_file(path)
                .with_context(|| format!("loading parameters from {:?}", path))?,
            None => BacktestParameters::default(),
        };

        if let Some(symbol) = &self.symbol {
            params.symbol = symbol.clone();
        }
        if let Some(short) = self.sma_short {
            params.sma_short = short;
        }
        if let Some(long) = self.sma_long {
            params.sma_long = long;
        }
        if let Some(start) = self.start {
            params.start = start;
        }
        if let Some(end) = self.end {
            params.end = end;
        }

        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();
    let params = args.parameters()?;

    let source: Box<dyn PriceSource> = match &args.data_file {
        Some(path) => {
            info!("Loading {} prices from {:?}", params.symbol, path);
            Box::new(FileSource::new(path))
        }
        None => {
            info!(
                seed = args.seed,
                initial_price = args.initial_price,
                "Using synthetic prices"
            );
            Box::new(SyntheticSource::new(SyntheticConfig {
                initial_price: args.initial_price,
                seed: args.seed,
                ..Default::default()
            }))
        }
    };

    let mut backtester = Backtester::new(params, source.as_ref())?;
    backtester.run()?;
    let report = backtester.report()?;

    match args.output.as_str() {
        "json" => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
        "text" => println!("{}", report),
        _ => {
            tracing::warn!("Unknown output format: {}. Using text.", args.output);
            println!("{}", report);
        }
    }

    if let Some(path) = &args.chart_csv {
        let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
        backtester.chart()?.write_csv(BufWriter::new(file))?;
        info!("Wrote cumulative returns to {:?}", path);
    }

    Ok(())
}

/// Log to stderr so stdout carries only the report
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
