/// Calculate period-over-period log returns
///
/// Entry `i` is `ln(prices[i] / prices[i - 1])`. The first entry has no
/// prior price and is `None`.
pub fn calculate_log_returns(prices: &[f64]) -> Vec<Option<f64>> {
    if prices.is_empty() {
        return vec![];
    }

    std::iter::once(None)
        .chain(prices.windows(2).map(|w| Some((w[1] / w[0]).ln())))
        .collect()
}
