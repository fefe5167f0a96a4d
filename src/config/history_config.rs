use std::env;

#[derive(Debug, Clone)]
pub struct HistoryEnvConfig {
    pub capacity: usize,
    pub history_path: String,
    pub persistence_enabled: bool,
}

impl HistoryEnvConfig {
    pub fn from_env() -> Self {
        let capacity = env::var("HISTORY_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let history_path =
            env::var("HISTORY_PATH").unwrap_or_else(|_| "data/history.csv".to_string());

        let persistence_enabled = env::var("PERSISTENCE_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            capacity,
            history_path,
            persistence_enabled,
        }
    }
}
