/// Rolling arithmetic mean of the trailing `period` prices.
///
/// The output is aligned with `prices`: entry `i` is the mean of
/// `prices[i + 1 - period..=i]`, or `None` while fewer than `period`
/// prices are available. A zero period yields all `None`.
///
/// Every window is averaged independently; a window of equal prices
/// averages to exactly that price.
pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut sma = vec![None; prices.len()];
    if period == 0 || prices.len() < period {
        return sma;
    }

    for (i, window) in prices.windows(period).enumerate() {
        sma[i + period - 1] = Some(window_mean(window));
    }

    sma
}

/// Mean taken as offsets from the window's first price
fn window_mean(window: &[f64]) -> f64 {
    let base = window[0];
    let offset: f64 = window.iter().map(|p| p - base).sum();
    base + offset / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_basic() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let sma = calculate_sma(&prices, 3);

        assert_eq!(sma.len(), prices.len());
        assert!(sma[0].is_none());
        assert!(sma[1].is_none());
        assert_eq!(sma[2], Some(2.0)); // (1+2+3)/3
        assert_eq!(sma[3], Some(3.0)); // (2+3+4)/3
        assert_eq!(sma[9], Some(9.0)); // (8+9+10)/3
    }

    #[test]
    fn test_sma_period_larger_than_data() {
        let prices = vec![1.0, 2.0, 3.0];
        let sma = calculate_sma(&prices, 5);

        assert!(sma.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_sma_zero_period() {
        let sma = calculate_sma(&[1.0, 2.0], 0);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let prices = vec![4.0, 8.0, 15.0];
        let sma = calculate_sma(&prices, 1);
        assert_eq!(sma, vec![Some(4.0), Some(8.0), Some(15.0)]);
    }

    #[test]
    fn test_sma_flat_run_after_large_swings() {
        let mut prices = vec![1e9, 0.3, 7e8, 0.1, 3.7e9, 0.7];
        prices.extend(std::iter::repeat(1.1).take(20));

        let short = calculate_sma(&prices, 2);
        let long = calculate_sma(&prices, 6);

        let last = prices.len() - 1;
        assert_eq!(short[last], Some(1.1));
        assert_eq!(long[last], Some(1.1));
        assert_eq!(short[last], long[last]);
    }

    #[test]
    fn test_sma_matches_direct_mean() {
        let prices = vec![100.0, 102.0, 101.0, 105.0, 107.0, 103.0, 110.0];
        let sma = calculate_sma(&prices, 4);

        for i in 3..prices.len() {
            let direct = prices[i - 3..=i].iter().sum::<f64>() / 4.0;
            assert_relative_eq!(sma[i].unwrap(), direct, epsilon = 1e-12);
        }
    }
}
