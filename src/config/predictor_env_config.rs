use std::env;

#[derive(Debug, Clone)]
pub struct PredictorEnvConfig {
    pub feature_window: usize,
    pub min_training_rounds: usize,
    pub retrain_interval: usize,
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub clamp_min: f64,
    pub clamp_max: f64,
    pub model_path: Option<String>,
}

impl PredictorEnvConfig {
    pub fn from_env() -> Self {
        let feature_window = env::var("FEATURE_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let min_training_rounds = env::var("MIN_TRAINING_ROUNDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let retrain_interval = env::var("RETRAIN_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let n_trees = env::var("N_TREES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let max_depth = env::var("MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let min_samples_split = env::var("MIN_SAMPLES_SPLIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let clamp_min = env::var("CLAMP_MIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.1);

        let clamp_max = env::var("CLAMP_MAX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10.0);

        let model_path = env::var("MODEL_PATH").ok().filter(|v| !v.is_empty());

        Self {
            feature_window,
            min_training_rounds,
            retrain_interval,
            n_trees,
            max_depth,
            min_samples_split,
            clamp_min,
            clamp_max,
            model_path,
        }
    }
}
