use crate::domain::observation::Observation;
use crate::domain::ports::{HistoryRepository, ObservationFeed};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Feed that emits a scripted sequence of multipliers with deterministic
/// one-minute-apart timestamps, then reports no new data. For tests.
pub struct ScriptedFeed {
    values: Mutex<VecDeque<f64>>,
    next_timestamp: Mutex<DateTime<Utc>>,
}

impl ScriptedFeed {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: Mutex::new(values.into()),
            next_timestamp: Mutex::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
                    .single()
                    .unwrap_or_default(),
            ),
        }
    }
}

#[async_trait]
impl ObservationFeed for ScriptedFeed {
    async fn next_observation(&self) -> Result<Option<Observation>> {
        let Some(value) = self.values.lock().await.pop_front() else {
            return Ok(None);
        };
        let mut ts = self.next_timestamp.lock().await;
        let observation = Observation::new(*ts, value);
        *ts += Duration::minutes(1);
        Ok(Some(observation))
    }
}

/// No-op repository for tests and ephemeral sessions.
pub struct NullHistoryRepository;

#[async_trait]
impl HistoryRepository for NullHistoryRepository {
    async fn save(&self, _observations: &[Observation]) -> Result<()> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Observation>> {
        Ok(Vec::new())
    }
}
