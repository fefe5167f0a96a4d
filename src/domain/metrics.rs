use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Aggregate session statistics over the current history snapshot, evaluated
/// as if every round had been played with a flat stake at a fixed target exit.
///
/// A round "wins" when its crash multiplier reaches the target exit; the
/// payout is stake * (exit - 1), a loss forfeits the stake.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetrics {
    pub rounds: usize,
    pub average_crash: f64,
    /// 0..100
    pub win_rate: f64,
    pub total_profit: Decimal,
    /// Percent return on total amount staked
    pub roi: f64,
}

impl SessionMetrics {
    pub fn compute(values: &[f64], target_exit: f64, flat_stake: Decimal) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let rounds = values.len();
        let average_crash = values.iter().sum::<f64>() / rounds as f64;
        let wins = values.iter().filter(|&&v| v >= target_exit).count();
        let win_rate = wins as f64 / rounds as f64 * 100.0;

        let payout = Decimal::from_f64(target_exit - 1.0).unwrap_or(Decimal::ZERO);
        let total_profit = flat_stake * payout * Decimal::from(wins)
            - flat_stake * Decimal::from(rounds - wins);

        let staked = flat_stake * Decimal::from(rounds);
        let roi = if staked > Decimal::ZERO {
            use rust_decimal::prelude::ToPrimitive;
            (total_profit / staked).to_f64().unwrap_or(0.0) * 100.0
        } else {
            0.0
        };

        Some(Self {
            rounds,
            average_crash,
            win_rate,
            total_profit,
            roi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_history_has_no_metrics() {
        assert!(SessionMetrics::compute(&[], 2.0, dec!(10)).is_none());
    }

    #[test]
    fn test_metrics_arithmetic() {
        // Target 2.0: wins are 2.5 and 3.0
        let values = [1.5, 2.5, 3.0, 1.2];
        let m = SessionMetrics::compute(&values, 2.0, dec!(10)).unwrap();

        assert_eq!(m.rounds, 4);
        assert!((m.average_crash - 2.05).abs() < 1e-12);
        assert!((m.win_rate - 50.0).abs() < 1e-12);
        // 2 wins * $10 * (2.0 - 1.0) - 2 losses * $10 = $0
        assert_eq!(m.total_profit, dec!(0));
        assert!((m.roi - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_wins_positive_roi() {
        let values = [3.0, 4.0, 5.0];
        let m = SessionMetrics::compute(&values, 2.0, dec!(10)).unwrap();
        assert_eq!(m.win_rate, 100.0);
        assert_eq!(m.total_profit, dec!(30));
        assert!((m.roi - 100.0).abs() < 1e-9);
    }
}
