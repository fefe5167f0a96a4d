use crate::domain::observation::Observation;
use crate::domain::ports::ObservationFeed;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

/// Synthetic round generator for demo and testing: uniform crash multipliers
/// over [low, high), one round per poll.
///
/// Draws at or below 1.0 are possible at the bottom of the range and are left
/// in on purpose: the history boundary rejects them and the loop retries next
/// cycle, same as a garbled scrape would.
pub struct SimulatedFeed {
    low: f64,
    high: f64,
}

impl SimulatedFeed {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: low.min(high),
            high: high.max(low),
        }
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        // Matches the observed spread of real rounds
        Self::new(1.0, 15.0)
    }
}

#[async_trait]
impl ObservationFeed for SimulatedFeed {
    async fn next_observation(&self) -> Result<Option<Observation>> {
        // A collapsed range cannot be sampled; emit the bound as a constant
        let value = if self.low < self.high {
            let mut rng = rand::rng();
            rng.random_range(self.low..self.high)
        } else {
            self.low
        };
        Ok(Some(Observation::new(Utc::now(), value)))
    }
}
