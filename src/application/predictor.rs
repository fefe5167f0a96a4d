use crate::domain::errors::PredictorError;
use crate::domain::features::FeatureBuilder;
use crate::domain::observation::Observation;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Rounds required before the first successful train
    pub min_training_rounds: usize,
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    /// Predictions are clamped into [clamp_min, clamp_max] to avoid
    /// pathological extrapolation
    pub clamp_min: f64,
    pub clamp_max: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_training_rounds: 10,
            n_trees: 100,
            max_depth: 5,
            min_samples_split: 2,
            clamp_min: 1.1,
            clamp_max: 10.0,
        }
    }
}

/// A clamped point prediction for the next round, with a 0..100 confidence
/// score derived inversely from recent volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub confidence: f64,
}

/// Random-forest regressor over rolling-window features of the observed
/// history. Untrained until the first successful `train`; retraining
/// replaces the model wholesale.
pub struct CrashPredictor {
    config: PredictorConfig,
    features: FeatureBuilder,
    model: Option<Forest>,
}

impl CrashPredictor {
    pub fn new(config: PredictorConfig, features: FeatureBuilder) -> Self {
        Self {
            config,
            features,
            model: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// (trailing-window features at round i, multiplier of round i+1) pairs
    /// over the whole history, oldest first.
    fn training_pairs(&self, observations: &[Observation]) -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::with_capacity(observations.len().saturating_sub(1));
        let mut y = Vec::with_capacity(observations.len().saturating_sub(1));

        for i in 0..observations.len().saturating_sub(1) {
            if let Some(fv) = self.features.build(&observations[..=i]) {
                x.push(fv.to_row());
                y.push(observations[i + 1].value);
            }
        }
        (x, y)
    }

    /// Refit the forest on the full history. Fails with `NotReady` below the
    /// minimum training-set size; a chronological 80/20 split is used for a
    /// one-off out-of-sample error estimate, then discarded.
    pub fn train(&mut self, observations: &[Observation]) -> Result<(), PredictorError> {
        if observations.len() < self.config.min_training_rounds {
            return Err(PredictorError::NotReady {
                observed: observations.len(),
                required: self.config.min_training_rounds,
            });
        }

        let (x, y) = self.training_pairs(observations);
        if x.len() < 2 {
            return Err(PredictorError::NotReady {
                observed: observations.len(),
                required: self.config.min_training_rounds,
            });
        }

        let split = ((x.len() as f64 * 0.8).floor() as usize).max(1);
        let (x_train, y_train) = (&x[..split], &y[..split]);
        let (x_test, y_test) = (&x[split..], &y[split..]);

        let x_matrix = DenseMatrix::from_2d_vec(&x_train.to_vec())
            .map_err(|e| PredictorError::Training {
                reason: format!("Matrix error: {}", e),
            })?;

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.config.n_trees)
            .with_max_depth(self.config.max_depth)
            .with_min_samples_split(self.config.min_samples_split);

        let model = RandomForestRegressor::fit(&x_matrix, &y_train.to_vec(), params)
            .map_err(|e| PredictorError::Training {
                reason: format!("Fit error: {}", e),
            })?;

        if !x_test.is_empty() {
            match DenseMatrix::from_2d_vec(&x_test.to_vec())
                .map_err(|e| e.to_string())
                .and_then(|m| model.predict(&m).map_err(|e| e.to_string()))
            {
                Ok(pred) => {
                    let sq_err: f64 = pred
                        .iter()
                        .zip(y_test.iter())
                        .map(|(p, t)| (p - t).powi(2))
                        .sum();
                    let rmse = (sq_err / pred.len() as f64).sqrt();
                    info!(
                        "Predictor retrained on {} pairs (OOS n={}, RMSE={:.4})",
                        split,
                        x_test.len(),
                        rmse
                    );
                }
                Err(e) => warn!("OOS evaluation skipped: {}", e),
            }
        } else {
            debug!("Predictor retrained on {} pairs (no OOS split)", split);
        }

        self.model = Some(model);
        Ok(())
    }

    /// Predict the next multiplier from the trailing window. `None` when
    /// untrained or the history is empty.
    pub fn predict(&self, observations: &[Observation]) -> Option<Prediction> {
        let model = self.model.as_ref()?;
        let fv = self.features.build(observations)?;

        let input = match DenseMatrix::from_2d_vec(&vec![fv.to_row()]) {
            Ok(m) => m,
            Err(e) => {
                warn!("Prediction input matrix failed: {}", e);
                return None;
            }
        };

        let raw = match model.predict(&input) {
            Ok(p) => *p.first()?,
            Err(e) => {
                warn!("Prediction failed: {}", e);
                return None;
            }
        };

        let value = raw.clamp(self.config.clamp_min, self.config.clamp_max);
        let confidence = (100.0 / (1.0 + fv.std_dev)).clamp(0.0, 100.0);

        Some(Prediction { value, confidence })
    }

    pub fn save_model(&self, path: &Path) -> Result<(), PredictorError> {
        let model = self.model.as_ref().ok_or_else(|| PredictorError::Serialization {
            reason: "no trained model to save".to_string(),
        })?;
        let mut file = File::create(path).map_err(|e| PredictorError::Serialization {
            reason: e.to_string(),
        })?;
        serde_json::to_writer(&mut file, model).map_err(|e| PredictorError::Serialization {
            reason: e.to_string(),
        })?;
        info!("Saved model to {:?}", path);
        Ok(())
    }

    pub fn load_model(&mut self, path: &Path) -> Result<(), PredictorError> {
        let file = File::open(path).map_err(|e| PredictorError::Serialization {
            reason: e.to_string(),
        })?;
        let model: Forest =
            serde_json::from_reader(file).map_err(|e| PredictorError::Serialization {
                reason: e.to_string(),
            })?;
        info!("Loaded model from {:?}", path);
        self.model = Some(model);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(values: &[f64]) -> Vec<Observation> {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(base + chrono::Duration::minutes(i as i64), v))
            .collect()
    }

    fn predictor() -> CrashPredictor {
        CrashPredictor::new(PredictorConfig::default(), FeatureBuilder::new(10))
    }

    #[test]
    fn test_train_not_ready_below_minimum() {
        let mut p = predictor();
        for n in 0..10 {
            let history = obs(&vec![2.0; n]);
            let err = p.train(&history).unwrap_err();
            assert!(matches!(err, PredictorError::NotReady { .. }));
            assert!(!p.is_trained());
        }
    }

    #[test]
    fn test_predict_none_when_untrained() {
        let p = predictor();
        assert!(p.predict(&obs(&[1.2, 1.5, 1.8])).is_none());
    }

    #[test]
    fn test_scenario_ten_rounds_trains_and_predicts_in_range() {
        let history = obs(&[1.2, 1.5, 1.8, 2.0, 2.3, 1.1, 1.4, 1.6, 1.9, 2.5]);
        let mut p = predictor();

        p.train(&history).expect("10 rounds should be enough to train");
        assert!(p.is_trained());

        let pred = p.predict(&history).expect("trained predictor must predict");
        assert!(pred.value >= 1.1 && pred.value <= 10.0);
        assert!(pred.confidence >= 0.0 && pred.confidence <= 100.0);
    }

    #[test]
    fn test_prediction_always_clamped() {
        // Extreme multipliers push the raw regression output outside the
        // plausible band; the clamp must hold regardless.
        let history = obs(&[
            50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0,
        ]);
        let mut p = predictor();
        p.train(&history).unwrap();

        let pred = p.predict(&history).unwrap();
        assert!(pred.value >= 1.1 && pred.value <= 10.0);
    }

    #[test]
    fn test_predict_none_on_empty_history() {
        let history = obs(&[1.2, 1.5, 1.8, 2.0, 2.3, 1.1, 1.4, 1.6, 1.9, 2.5]);
        let mut p = predictor();
        p.train(&history).unwrap();
        assert!(p.predict(&[]).is_none());
    }

    #[test]
    fn test_retrain_replaces_model_in_place() {
        let first = obs(&[1.2, 1.5, 1.8, 2.0, 2.3, 1.1, 1.4, 1.6, 1.9, 2.5]);
        let mut p = predictor();
        p.train(&first).unwrap();

        let second = obs(&[3.2, 3.5, 3.8, 3.0, 3.3, 3.1, 3.4, 3.6, 3.9, 3.5, 3.7, 3.2]);
        p.train(&second).unwrap();
        assert!(p.is_trained());
        assert!(p.predict(&second).is_some());
    }

    #[test]
    fn test_model_round_trip_through_file() {
        let history = obs(&[1.2, 1.5, 1.8, 2.0, 2.3, 1.1, 1.4, 1.6, 1.9, 2.5]);
        let mut p = predictor();
        p.train(&history).unwrap();

        let path = std::env::temp_dir().join(format!("crashcast-model-{}.json", std::process::id()));
        p.save_model(&path).unwrap();

        let mut fresh = predictor();
        assert!(!fresh.is_trained());
        fresh.load_model(&path).unwrap();
        assert!(fresh.is_trained());
        assert!(fresh.predict(&history).is_some());

        let _ = std::fs::remove_file(&path);
    }
}
