use chrono::{Datelike, Duration, NaiveDate, Weekday};
use common::{PricePoint, PriceSeries, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random-walk settings for synthetic closing prices
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub initial_price: f64,
    /// Half-width of the uniform daily return
    pub daily_volatility: f64,
    pub drift: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            daily_volatility: 0.02,
            drift: 0.0003,
            seed: 42,
        }
    }
}

/// Generate weekday closing prices over `[start, end)`.
///
/// Same config and range always give the same series.
pub fn generate_synthetic_prices(
    config: &SyntheticConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut points = Vec::new();
    let mut price = config.initial_price;

    let mut date = start;
    while date < end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            points.push(PricePoint::new(date, price));
            let shock: f64 = rng.gen_range(-1.0..1.0);
            price *= 1.0 + config.drift + config.daily_volatility * shock;
        }
        date += Duration::days(1);
    }

    PriceSeries::new(points)
}
