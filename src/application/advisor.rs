use crate::application::predictor::Prediction;
use crate::domain::recommendation::{ConfidenceLabel, Recommendation, Trend};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Conservative stake band as fractions of bankroll
    pub min_stake_pct: f64,
    pub max_stake_pct: f64,
    /// Exit = prediction * margin, so the exit always undercuts the prediction
    pub exit_margin: f64,
    /// Points considered for the monotonicity trend check
    pub trend_lookback: usize,
    /// Confidence assigned to the recent-mean fallback
    pub heuristic_confidence: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            min_stake_pct: 0.01,
            max_stake_pct: 0.03,
            exit_margin: 0.8,
            trend_lookback: 4,
            heuristic_confidence: 10.0,
        }
    }
}

/// Maps a prediction plus recent history into a bounded stake/exit
/// recommendation. Pure: no side effects, no I/O.
#[derive(Debug, Clone)]
pub struct StakeAdvisor {
    config: AdvisorConfig,
}

impl StakeAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Trend over the trailing lookback: strictly monotone up is Rising,
    /// strictly monotone down is Falling, anything else Mixed.
    pub fn detect_trend(&self, recent: &[f64]) -> Trend {
        let skip = recent.len().saturating_sub(self.config.trend_lookback);
        let tail = &recent[skip..];
        if tail.len() < 2 {
            return Trend::Mixed;
        }

        let rising = tail.windows(2).all(|w| w[1] > w[0]);
        let falling = tail.windows(2).all(|w| w[1] < w[0]);
        match (rising, falling) {
            (true, false) => Trend::Rising,
            (false, true) => Trend::Falling,
            _ => Trend::Mixed,
        }
    }

    pub fn advise(
        &self,
        prediction: Prediction,
        recent: &[f64],
        bankroll: Decimal,
    ) -> Recommendation {
        self.build(prediction, recent, bankroll, false)
    }

    /// Fallback while the predictor is untrained: pseudo-prediction from the
    /// recent mean with a fixed low confidence. `None` on empty history.
    pub fn heuristic(&self, recent: &[f64], bankroll: Decimal) -> Option<Recommendation> {
        if recent.is_empty() {
            return None;
        }
        let mean = recent.iter().sum::<f64>() / recent.len() as f64;
        let prediction = Prediction {
            value: mean.max(1.1),
            confidence: self.config.heuristic_confidence,
        };
        Some(self.build(prediction, recent, bankroll, true))
    }

    fn build(
        &self,
        prediction: Prediction,
        recent: &[f64],
        bankroll: Decimal,
        heuristic: bool,
    ) -> Recommendation {
        let trend = self.detect_trend(recent);
        let confidence = prediction.confidence.clamp(0.0, 100.0);

        // Linear in confidence within the band; a falling streak drops
        // straight to the floor.
        let span = self.config.max_stake_pct - self.config.min_stake_pct;
        let mut stake_fraction = self.config.min_stake_pct + span * (confidence / 100.0);
        if trend == Trend::Falling {
            stake_fraction = self.config.min_stake_pct;
        }
        stake_fraction =
            stake_fraction.clamp(self.config.min_stake_pct, self.config.max_stake_pct);

        let recommended_stake = (bankroll
            * Decimal::from_f64(stake_fraction).unwrap_or(Decimal::ZERO))
        .round_dp(2);

        let exit_floor = 1.01;
        let recommended_exit = (prediction.value * self.config.exit_margin)
            .clamp(exit_floor, prediction.value.max(exit_floor));

        let win_probability = if recent.is_empty() {
            0.0
        } else {
            recent.iter().filter(|&&v| v >= recommended_exit).count() as f64
                / recent.len() as f64
        };

        // EV of staking at this exit, using the empirical win probability
        let edge = (recommended_exit - 1.0) * win_probability - (1.0 - win_probability);
        let expected_value =
            (recommended_stake * Decimal::from_f64(edge).unwrap_or(Decimal::ZERO)).round_dp(2);

        Recommendation {
            predicted_value: prediction.value,
            confidence,
            label: ConfidenceLabel::from_score(confidence),
            trend,
            stake_fraction,
            recommended_stake,
            recommended_exit,
            win_probability,
            expected_value,
            heuristic,
        }
    }
}
