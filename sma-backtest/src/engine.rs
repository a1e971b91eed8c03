use common::{BacktestError, BacktestResult, PreparedRow, PreparedSeries, Result, ResultRow};
use tracing::info;

use crate::metrics::MetricsCalculator;
use crate::signals::SignalGenerator;

/// SMA crossover backtest engine
///
/// Stateless: every call to [`BacktestEngine::run`] is a single pass over
/// the prepared series and returns a fresh result.
pub struct BacktestEngine;

impl BacktestEngine {
    /// Run the crossover strategy against buy-and-hold on a prepared series
    pub fn run(prepared: &PreparedSeries) -> Result<BacktestResult> {
        let rows = &prepared.rows;
        let (start_date, end_date) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => return Err(BacktestError::EmptyResult),
        };
        Self::check_rows(rows)?;

        let log_returns: Vec<f64> = rows.iter().map(|r| r.log_return).collect();
        let positions = SignalGenerator::positions(rows);
        let strategy_returns = MetricsCalculator::strategy_returns(&positions, &log_returns);

        let benchmark_curve = MetricsCalculator::cumulative_curve(log_returns.iter().copied());
        let strategy_curve = MetricsCalculator::cumulative_curve(
            strategy_returns.iter().map(|r| r.unwrap_or(0.0)),
        );

        let result_rows: Vec<ResultRow> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ResultRow {
                date: row.date,
                close: row.close,
                log_return: row.log_return,
                sma_short: row.sma_short,
                sma_long: row.sma_long,
                position: positions[i],
                strategy_return: strategy_returns[i],
                cumulative_benchmark: benchmark_curve[i],
                cumulative_strategy: strategy_curve[i],
            })
            .collect();

        let strategy_return = MetricsCalculator::final_value(&strategy_curve);
        let benchmark_return = MetricsCalculator::final_value(&benchmark_curve);
        let outperformance = strategy_return - benchmark_return;

        info!(
            rows = result_rows.len(),
            %start_date,
            %end_date,
            strategy_return,
            benchmark_return,
            outperformance,
            "backtest complete"
        );

        Ok(BacktestResult {
            rows: result_rows,
            start_date,
            end_date,
            strategy_return,
            benchmark_return,
            outperformance,
        })
    }

    /// Reject series that could not have come out of `prepare`
    fn check_rows(rows: &[PreparedRow]) -> Result<()> {
        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(BacktestError::MalformedSeries(format!(
                    "prepared dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        if let Some(bad) = rows.iter().find(|r| {
            !(r.log_return.is_finite() && r.sma_short.is_finite() && r.sma_long.is_finite())
        }) {
            return Err(BacktestError::MalformedSeries(format!(
                "undefined indicator value on {}",
                bad.date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use common::{Position, PricePoint, PriceSeries};

    fn generate_test_prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
                .collect(),
        )
        .unwrap()
    }

    fn wavy_closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + (i as f64 * 0.1).sin() * 5.0 + (i as f64 * 0.37).cos())
            .collect()
    }

    fn run_closes(closes: &[f64], short: usize, long: usize) -> BacktestResult {
        let prepared = prepare(&generate_test_prices(closes), short, long).unwrap();
        BacktestEngine::run(&prepared).unwrap()
    }

    #[test]
    fn test_scenario_first_position_long() {
        let closes = [
            100.0, 102.0, 101.0, 105.0, 107.0, 103.0, 110.0, 108.0, 115.0, 112.0,
        ];
        let result = run_closes(&closes, 2, 4);

        assert_eq!(result.rows.len(), 7);
        assert_eq!(result.rows[0].position, Position::Long);
        assert!(result.rows[0].strategy_return.is_none());
    }

    #[test]
    fn test_empty_prepared_series() {
        let prepared = PreparedSeries {
            sma_short_window: 2,
            sma_long_window: 4,
            rows: vec![],
        };
        assert!(matches!(
            BacktestEngine::run(&prepared),
            Err(BacktestError::EmptyResult)
        ));
    }

    #[test]
    fn test_malformed_prepared_series() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let row = PreparedRow {
            date,
            close: 100.0,
            log_return: f64::NAN,
            sma_short: 100.0,
            sma_long: 100.0,
        };
        let prepared = PreparedSeries {
            sma_short_window: 2,
            sma_long_window: 4,
            rows: vec![row],
        };
        assert!(matches!(
            BacktestEngine::run(&prepared),
            Err(BacktestError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let closes = wavy_closes(200);
        let first = run_closes(&closes, 5, 20);
        let second = run_closes(&closes, 5, 20);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_no_look_ahead() {
        let closes = wavy_closes(120);
        let result = run_closes(&closes, 5, 20);

        for t in 1..result.rows.len() {
            let expected = result.rows[t - 1].position.sign() * result.rows[t].log_return;
            assert_eq!(result.rows[t].strategy_return, Some(expected));
        }

        // Perturbing the last price must not move any earlier position
        let mut shocked = closes.clone();
        *shocked.last_mut().unwrap() *= 3.0;
        let shocked_result = run_closes(&shocked, 5, 20);
        let n = result.rows.len();
        for t in 0..n - 1 {
            assert_eq!(result.rows[t].position, shocked_result.rows[t].position);
        }
    }

    #[test]
    fn test_benchmark_curve_round_trips_log_returns() {
        let result = run_closes(&wavy_closes(150), 10, 30);

        assert_relative_eq!(
            result.rows[0].cumulative_benchmark.ln(),
            result.rows[0].log_return,
            epsilon = 1e-9
        );
        for pair in result.rows.windows(2) {
            let step = pair[1].cumulative_benchmark.ln() - pair[0].cumulative_benchmark.ln();
            assert_relative_eq!(step, pair[1].log_return, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_benchmark_matches_price_ratio() {
        let closes = wavy_closes(100);
        let result = run_closes(&closes, 5, 20);

        // First prepared row is input index 19; its return starts from index 18
        let expected = closes[99] / closes[18];
        assert_relative_eq!(result.benchmark_return, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_prices() {
        let result = run_closes(&[100.0; 20], 5, 10);

        assert!(result
            .rows
            .iter()
            .all(|r| r.position == Position::Short && r.sma_short == 100.0 && r.sma_long == 100.0));
        assert_eq!(result.strategy_return, 1.0);
        assert_eq!(result.benchmark_return, 1.0);
        assert_eq!(result.outperformance, 0.0);
    }

    #[test]
    fn test_flat_run_after_swings_is_short() {
        let mut closes = vec![1e9, 0.3, 7e8, 0.1, 3.7e9, 0.7];
        closes.extend(std::iter::repeat(1.1).take(20));
        let result = run_closes(&closes, 2, 6);

        let last = result.rows.last().unwrap();
        assert_eq!(last.sma_short, last.sma_long);
        assert_eq!(last.position, Position::Short);
    }

    #[test]
    fn test_rising_prices_lag_benchmark_by_first_return() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let result = run_closes(&closes, 3, 8);

        assert!(result.rows.iter().all(|r| r.position == Position::Long));
        let first_return = result.rows[0].log_return;
        assert_relative_eq!(
            result.strategy_return,
            result.benchmark_return / first_return.exp(),
            epsilon = 1e-9
        );
        assert!(result.strategy_return <= result.benchmark_return);
        assert!(result.outperformance < 0.0);
    }

    #[test]
    fn test_performance_tuple() {
        let result = run_closes(&wavy_closes(80), 5, 20);
        let (strategy, outperformance) = result.performance();

        assert_eq!(strategy, result.rows.last().unwrap().cumulative_strategy);
        assert_relative_eq!(
            outperformance,
            strategy - result.rows.last().unwrap().cumulative_benchmark,
            epsilon = 1e-12
        );
    }
}
