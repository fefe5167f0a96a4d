use crate::domain::errors::HistoryError;
use crate::domain::observation::Observation;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Bounded, append-only sequence of observed crash multipliers.
///
/// Oldest entries are evicted FIFO once capacity is reached. A crash
/// multiplier of 1.0 means the round ended instantly; anything at or below
/// that is not a valid outcome and is rejected at this boundary.
#[derive(Debug, Clone)]
pub struct RoundHistory {
    rounds: VecDeque<Observation>,
    capacity: usize,
}

impl RoundHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            rounds: VecDeque::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
        }
    }

    /// Append an observation with the given timestamp.
    pub fn record_at(
        &mut self,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Result<(), HistoryError> {
        if !(value > 1.0) || !value.is_finite() {
            return Err(HistoryError::InvalidMultiplier { value });
        }

        self.rounds.push_back(Observation::new(timestamp, value));
        while self.rounds.len() > self.capacity {
            self.rounds.pop_front();
        }
        Ok(())
    }

    /// Append an observation stamped with the current time.
    pub fn record(&mut self, value: f64) -> Result<(), HistoryError> {
        self.record_at(Utc::now(), value)
    }

    /// Ordered copy of the full history, oldest first.
    pub fn snapshot(&self) -> Vec<Observation> {
        self.rounds.iter().copied().collect()
    }

    /// Raw multiplier values, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.rounds.iter().map(|o| o.value).collect()
    }

    /// The trailing `n` multiplier values, oldest first.
    pub fn recent(&self, n: usize) -> Vec<f64> {
        let skip = self.rounds.len().saturating_sub(n);
        self.rounds.iter().skip(skip).map(|o| o.value).collect()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Seed the history from persisted observations, keeping only the newest
    /// entries if the recording exceeds capacity.
    pub fn restore(&mut self, observations: Vec<Observation>) {
        for obs in observations {
            if obs.value > 1.0 && obs.value.is_finite() {
                self.rounds.push_back(obs);
            }
        }
        while self.rounds.len() > self.capacity {
            self.rounds.pop_front();
        }
    }
}
