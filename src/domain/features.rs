use crate::domain::observation::Observation;
use chrono::Timelike;
use statrs::statistics::{Data, Distribution};

/// Windowed statistics derived from a trailing slice of history, plus the
/// temporal fields of the newest observation in that slice.
///
/// Temporal fields come from the observation timestamp rather than the wall
/// clock so that building twice from the same snapshot yields the same vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub hour: f64,
    pub minute: f64,
}

impl FeatureVector {
    /// Flatten into the row layout the model was fit on. Order matters: any
    /// change here invalidates previously trained models.
    pub fn to_row(&self) -> Vec<f64> {
        vec![
            self.mean,
            self.std_dev,
            self.min,
            self.max,
            self.hour,
            self.minute,
        ]
    }
}

/// Builds feature vectors from trailing windows of observed rounds.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    window: usize,
}

impl FeatureBuilder {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Build a feature vector from the trailing at-most-`window` observations.
    ///
    /// Returns `None` only for an empty slice. A single-point window has
    /// std_dev 0 (population std, not sample std).
    pub fn build(&self, observations: &[Observation]) -> Option<FeatureVector> {
        if observations.is_empty() {
            return None;
        }

        let start = observations.len().saturating_sub(self.window);
        let tail = &observations[start..];
        let values: Vec<f64> = tail.iter().map(|o| o.value).collect();

        // Mean via statrs (f64 boundary for the statistical library)
        let data = Data::new(values.clone());
        let mean = data.mean().unwrap_or(0.0);

        // Population variance (ddof=0): a one-point window is defined, std 0
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        let std_dev = variance.sqrt();

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let newest = tail[tail.len() - 1].timestamp;

        Some(FeatureVector {
            mean,
            std_dev,
            min,
            max,
            hour: newest.hour() as f64,
            minute: newest.minute() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(values: &[f64]) -> Vec<Observation> {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(base + chrono::Duration::minutes(i as i64), v))
            .collect()
    }

    #[test]
    fn test_empty_history_yields_none() {
        let builder = FeatureBuilder::new(10);
        assert!(builder.build(&[]).is_none());
    }

    #[test]
    fn test_single_point_window_std_is_zero() {
        let builder = FeatureBuilder::new(10);
        let fv = builder.build(&obs(&[2.5])).unwrap();
        assert_eq!(fv.std_dev, 0.0);
        assert_eq!(fv.mean, 2.5);
        assert_eq!(fv.min, 2.5);
        assert_eq!(fv.max, 2.5);
    }

    #[test]
    fn test_known_statistics() {
        let builder = FeatureBuilder::new(4);
        let fv = builder.build(&obs(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!((fv.mean - 2.5).abs() < 1e-12);
        // Population std of [1,2,3,4] = sqrt(1.25)
        assert!((fv.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(fv.min, 1.0);
        assert_eq!(fv.max, 4.0);
    }

    #[test]
    fn test_trailing_window_only() {
        let builder = FeatureBuilder::new(2);
        let fv = builder.build(&obs(&[10.0, 2.0, 4.0])).unwrap();
        assert!((fv.mean - 3.0).abs() < 1e-12);
        assert_eq!(fv.max, 4.0);
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = FeatureBuilder::new(5);
        let history = obs(&[1.2, 1.5, 1.8, 2.0, 2.3, 1.1]);
        let a = builder.build(&history).unwrap();
        let b = builder.build(&history).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_row(), b.to_row());
    }

    #[test]
    fn test_temporal_fields_from_newest_observation() {
        let builder = FeatureBuilder::new(3);
        let fv = builder.build(&obs(&[1.2, 1.5, 1.8])).unwrap();
        // Base 14:30 plus two one-minute steps
        assert_eq!(fv.hour, 14.0);
        assert_eq!(fv.minute, 32.0);
    }
}
