use crate::domain::observation::Observation;
use anyhow::Result;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait ObservationFeed: Send + Sync {
    /// Poll for the next completed round. `Ok(None)` means no new data this
    /// cycle (not an error); the loop simply retries next tick.
    async fn next_observation(&self) -> Result<Option<Observation>>;
}

/// Best-effort persistence for the observed history. Failures are logged and
/// ignored by callers; an empty history is a valid start state.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn save(&self, observations: &[Observation]) -> Result<()>;
    async fn load(&self) -> Result<Vec<Observation>>;
}
