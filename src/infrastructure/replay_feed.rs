use crate::domain::observation::Observation;
use crate::domain::ports::{HistoryRepository, ObservationFeed};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

use super::csv_history::CsvHistoryRepository;

/// Replays a recorded history file one round per poll. Returns `None` once
/// the recording is exhausted, which the loop treats as "no new data".
pub struct ReplayFeed {
    remaining: Mutex<VecDeque<Observation>>,
}

impl ReplayFeed {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            remaining: Mutex::new(observations.into()),
        }
    }

    /// Load a recording in the same CSV layout the history repository writes.
    pub async fn from_path(path: PathBuf) -> Result<Self> {
        let observations = CsvHistoryRepository::new(path.clone()).load().await?;
        info!("Replaying {} rounds from {:?}", observations.len(), path);
        Ok(Self::new(observations))
    }
}

#[async_trait]
impl ObservationFeed for ReplayFeed {
    async fn next_observation(&self) -> Result<Option<Observation>> {
        Ok(self.remaining.lock().await.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_replay_in_order_then_exhausted() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let feed = ReplayFeed::new(vec![
            Observation::new(base, 1.5),
            Observation::new(base + chrono::Duration::minutes(1), 2.0),
        ]);

        assert_eq!(feed.next_observation().await.unwrap().unwrap().value, 1.5);
        assert_eq!(feed.next_observation().await.unwrap().unwrap().value, 2.0);
        assert!(feed.next_observation().await.unwrap().is_none());
        assert!(feed.next_observation().await.unwrap().is_none());
    }
}
