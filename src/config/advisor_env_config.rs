use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AdvisorEnvConfig {
    pub bankroll: Decimal,
    pub min_stake_pct: f64,
    pub max_stake_pct: f64,
    pub exit_margin: f64,
    pub trend_lookback: usize,
    pub metrics_target_exit: f64,
    pub metrics_stake: Decimal,
}

impl AdvisorEnvConfig {
    pub fn from_env() -> Self {
        let bankroll = env::var("BANKROLL")
            .ok()
            .and_then(|v| Decimal::from_str(&v).ok())
            .unwrap_or_else(|| Decimal::from(1000));

        let min_stake_pct = env::var("MIN_STAKE_PCT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.01); // 1% floor

        let max_stake_pct = env::var("MAX_STAKE_PCT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.03); // 3% cap

        let exit_margin = env::var("EXIT_MARGIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.8);

        let trend_lookback = env::var("TREND_LOOKBACK")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4);

        let metrics_target_exit = env::var("METRICS_TARGET_EXIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2.0);

        let metrics_stake = env::var("METRICS_STAKE")
            .ok()
            .and_then(|v| Decimal::from_str(&v).ok())
            .unwrap_or_else(|| Decimal::from(10));

        Self {
            bankroll,
            min_stake_pct,
            max_stake_pct,
            exit_margin,
            trend_lookback,
            metrics_target_exit,
            metrics_stake,
        }
    }
}
