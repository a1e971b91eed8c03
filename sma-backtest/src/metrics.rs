use common::Position;

/// Return aggregation for strategy and benchmark curves
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Apply each position to the following period's return.
    ///
    /// Entry `t` is `positions[t - 1] * log_returns[t]`, so a return is only
    /// ever traded on a signal known at the previous close. Entry 0 has no
    /// prior position and is `None`.
    pub fn strategy_returns(positions: &[Position], log_returns: &[f64]) -> Vec<Option<f64>> {
        let n = positions.len().min(log_returns.len());
        if n == 0 {
            return vec![];
        }

        std::iter::once(None)
            .chain(
                positions[..n - 1]
                    .iter()
                    .zip(&log_returns[1..n])
                    .map(|(position, r)| Some(position.sign() * r)),
            )
            .collect()
    }

    /// Running `exp(sum of log returns)`, starting from an implicit 1.0
    pub fn cumulative_curve<I>(log_returns: I) -> Vec<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        log_returns
            .into_iter()
            .scan(0.0, |acc, r| {
                *acc += r;
                Some(acc.exp())
            })
            .collect()
    }

    /// Final value of a cumulative curve, 1.0 if it is empty
    pub fn final_value(curve: &[f64]) -> f64 {
        curve.last().copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strategy_returns_are_lagged() {
        let positions = [Position::Long, Position::Short, Position::Long];
        let returns = [0.5, 0.1, 0.2];

        let strategy = MetricsCalculator::strategy_returns(&positions, &returns);

        assert_eq!(strategy, vec![None, Some(0.1), Some(-0.2)]);
    }

    #[test]
    fn test_strategy_returns_empty() {
        assert!(MetricsCalculator::strategy_returns(&[], &[]).is_empty());
    }

    #[test]
    fn test_cumulative_curve() {
        let curve = MetricsCalculator::cumulative_curve([0.1, -0.05, 0.02]);

        assert_eq!(curve.len(), 3);
        assert_relative_eq!(curve[0], (0.1f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(curve[2], (0.07f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_final_value_of_empty_curve() {
        assert_eq!(MetricsCalculator::final_value(&[]), 1.0);
        assert_eq!(MetricsCalculator::final_value(&[1.2, 1.5]), 1.5);
    }
}
