//! Configuration module for Crashcast.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Feed, History, Predictor, and Advisor.

mod advisor_env_config;
mod feed_config;
mod history_config;
mod predictor_env_config;

pub use advisor_env_config::AdvisorEnvConfig;
pub use feed_config::FeedEnvConfig;
pub use history_config::HistoryEnvConfig;
pub use predictor_env_config::PredictorEnvConfig;

use crate::application::advisor::AdvisorConfig;
use crate::application::engine::EngineConfig;
use crate::application::predictor::PredictorConfig;
use anyhow::Result;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Where observations come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Simulated,
    Replay,
}

impl FromStr for FeedMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" | "sim" => Ok(FeedMode::Simulated),
            "replay" => Ok(FeedMode::Replay),
            _ => anyhow::bail!("Invalid FEED_MODE: {}. Must be 'simulated' or 'replay'", s),
        }
    }
}

/// Main application configuration, aggregated from the per-concern
/// sub-configs.
#[derive(Debug, Clone)]
pub struct Config {
    // Core
    pub feed_mode: FeedMode,

    // Feed
    pub poll_interval_ms: u64,
    pub replay_path: String,
    pub sim_low: f64,
    pub sim_high: f64,

    // History
    pub history_capacity: usize,
    pub history_path: String,
    pub persistence_enabled: bool,

    // Predictor
    pub feature_window: usize,
    pub min_training_rounds: usize,
    pub retrain_interval: usize,
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub clamp_min: f64,
    pub clamp_max: f64,
    pub model_path: Option<String>,

    // Advisor
    pub bankroll: Decimal,
    pub min_stake_pct: f64,
    pub max_stake_pct: f64,
    pub exit_margin: f64,
    pub trend_lookback: usize,
    pub metrics_target_exit: f64,
    pub metrics_stake: Decimal,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("FEED_MODE").unwrap_or_else(|_| "simulated".to_string());
        let feed_mode = FeedMode::from_str(&mode_str)?;

        let feed = FeedEnvConfig::from_env();
        let history = HistoryEnvConfig::from_env();
        let predictor = PredictorEnvConfig::from_env();
        let advisor = AdvisorEnvConfig::from_env();

        Ok(Self {
            feed_mode,

            poll_interval_ms: feed.poll_interval_ms,
            replay_path: feed.replay_path,
            sim_low: feed.sim_low,
            sim_high: feed.sim_high,

            history_capacity: history.capacity,
            history_path: history.history_path,
            persistence_enabled: history.persistence_enabled,

            feature_window: predictor.feature_window,
            min_training_rounds: predictor.min_training_rounds,
            retrain_interval: predictor.retrain_interval,
            n_trees: predictor.n_trees,
            max_depth: predictor.max_depth,
            min_samples_split: predictor.min_samples_split,
            clamp_min: predictor.clamp_min,
            clamp_max: predictor.clamp_max,
            model_path: predictor.model_path,

            bankroll: advisor.bankroll,
            min_stake_pct: advisor.min_stake_pct,
            max_stake_pct: advisor.max_stake_pct,
            exit_margin: advisor.exit_margin,
            trend_lookback: advisor.trend_lookback,
            metrics_target_exit: advisor.metrics_target_exit,
            metrics_stake: advisor.metrics_stake,
        })
    }

    pub fn to_predictor_config(&self) -> PredictorConfig {
        PredictorConfig {
            min_training_rounds: self.min_training_rounds,
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            clamp_min: self.clamp_min,
            clamp_max: self.clamp_max,
        }
    }

    pub fn to_advisor_config(&self) -> AdvisorConfig {
        AdvisorConfig {
            min_stake_pct: self.min_stake_pct,
            max_stake_pct: self.max_stake_pct,
            exit_margin: self.exit_margin,
            trend_lookback: self.trend_lookback,
            ..AdvisorConfig::default()
        }
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            poll_interval_ms: self.poll_interval_ms,
            retrain_interval: self.retrain_interval,
            recent_window: self.feature_window,
            bankroll: self.bankroll,
            metrics_target_exit: self.metrics_target_exit,
            metrics_stake: self.metrics_stake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        let config = Config::from_env().expect("Should parse with defaults");
        assert_eq!(config.history_capacity, 1000);
        assert_eq!(config.feature_window, 10);
        assert_eq!(config.min_training_rounds, 10);
        assert!((config.min_stake_pct - 0.01).abs() < 1e-12);
        assert!((config.max_stake_pct - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_feed_mode_parsing() {
        assert!(matches!(
            FeedMode::from_str("simulated").unwrap(),
            FeedMode::Simulated
        ));
        assert!(matches!(
            FeedMode::from_str("REPLAY").unwrap(),
            FeedMode::Replay
        ));
        assert!(FeedMode::from_str("scraped").is_err());
    }
}
