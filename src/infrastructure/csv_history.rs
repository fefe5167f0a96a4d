use crate::domain::observation::Observation;
use crate::domain::ports::HistoryRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Flat record layout on disk: epoch seconds plus the raw multiplier.
#[derive(Debug, Serialize, Deserialize)]
struct RoundRecord {
    timestamp: i64,
    value: f64,
}

/// Stores the history as a flat CSV file. Saves rewrite the whole file via a
/// temp-file rename so a crash mid-write never leaves a torn recording.
pub struct CsvHistoryRepository {
    file_path: PathBuf,
}

impl CsvHistoryRepository {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }
}

#[async_trait]
impl HistoryRepository for CsvHistoryRepository {
    async fn save(&self, observations: &[Observation]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create history directory")?;
            }
        }

        let temp_path = self.file_path.with_extension("tmp");
        {
            let mut wtr =
                csv::Writer::from_path(&temp_path).context("Failed to open temp history file")?;
            for obs in observations {
                wtr.serialize(RoundRecord {
                    timestamp: obs.timestamp.timestamp(),
                    value: obs.value,
                })
                .context("Failed to serialize round")?;
            }
            wtr.flush().context("Failed to flush history file")?;
        }
        fs::rename(&temp_path, &self.file_path).context("Failed to replace history file")?;

        debug!("Saved {} rounds to {:?}", observations.len(), self.file_path);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Observation>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr =
            csv::Reader::from_path(&self.file_path).context("Failed to open history file")?;
        let mut observations = Vec::new();
        for result in rdr.deserialize() {
            let record: RoundRecord = result.context("Failed to parse round record")?;
            if let Some(timestamp) = DateTime::from_timestamp(record.timestamp, 0) {
                observations.push(Observation::new(timestamp, record.value));
            }
        }

        debug!(
            "Loaded {} rounds from {:?}",
            observations.len(),
            self.file_path
        );
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crashcast-{}-{}.csv", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let path = temp_path("roundtrip");
        let repo = CsvHistoryRepository::new(path.clone());

        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let observations = vec![
            Observation::new(base, 1.5),
            Observation::new(base + chrono::Duration::minutes(1), 2.75),
        ];

        repo.save(&observations).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].value, 1.5);
        assert_eq!(loaded[1].value, 2.75);
        assert_eq!(loaded[0].timestamp, base);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty_start() {
        let repo = CsvHistoryRepository::new(temp_path("missing-nonexistent"));
        let loaded = repo.load().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_recording() {
        let path = temp_path("overwrite");
        let repo = CsvHistoryRepository::new(path.clone());

        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        repo.save(&[Observation::new(base, 1.5)]).await.unwrap();
        repo.save(&[Observation::new(base, 3.0)]).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].value, 3.0);

        let _ = fs::remove_file(&path);
    }
}
