use common::{Position, PreparedRow};

/// Signal generator for the dual moving-average crossover rule
pub struct SignalGenerator;

impl SignalGenerator {
    /// Long while the short average is strictly above the long one,
    /// short otherwise. Equal averages resolve to short.
    pub fn position(sma_short: f64, sma_long: f64) -> Position {
        if sma_short > sma_long {
            Position::Long
        } else {
            Position::Short
        }
    }

    /// Position for every row, each from that row's own averages
    pub fn positions(rows: &[PreparedRow]) -> Vec<Position> {
        rows.iter()
            .map(|row| Self::position(row.sma_short, row.sma_long))
            .collect()
    }
}
