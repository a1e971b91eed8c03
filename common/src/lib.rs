pub mod config;
pub mod error;
pub mod types;

pub use config::BacktestParameters;
pub use error::{BacktestError, Result};
pub use types::*;
