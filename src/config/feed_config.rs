use std::env;

#[derive(Debug, Clone)]
pub struct FeedEnvConfig {
    pub poll_interval_ms: u64,
    pub replay_path: String,
    pub sim_low: f64,
    pub sim_high: f64,
}

impl FeedEnvConfig {
    pub fn from_env() -> Self {
        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        let replay_path =
            env::var("REPLAY_PATH").unwrap_or_else(|_| "data/rounds.csv".to_string());

        let sim_low = env::var("SIM_LOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0);

        let sim_high = env::var("SIM_HIGH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15.0);

        Self {
            poll_interval_ms,
            replay_path,
            sim_low,
            sim_high,
        }
    }
}
