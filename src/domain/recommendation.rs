use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of the recent multiplier sequence, decided by monotonicity
/// over the advisor's trend lookback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Falling,
    Mixed,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Mixed => write!(f, "mixed"),
        }
    }
}

/// Qualitative bucket for a 0..100 confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 66.0 {
            ConfidenceLabel::High
        } else if score >= 33.0 {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        }
    }
}

/// Bounded, risk-adjusted betting recommendation. Derived each cycle from the
/// latest prediction and recent history; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub predicted_value: f64,
    /// 0..100, inverse of recent volatility
    pub confidence: f64,
    pub label: ConfidenceLabel,
    pub trend: Trend,
    /// Fraction of bankroll, within the configured conservative band
    pub stake_fraction: f64,
    pub recommended_stake: Decimal,
    /// Exit multiplier, always strictly below the predicted value
    pub recommended_exit: f64,
    /// Empirical share of recent rounds reaching the recommended exit
    pub win_probability: f64,
    pub expected_value: Decimal,
    /// True when produced by the recent-mean heuristic rather than the model
    pub heuristic: bool,
}
