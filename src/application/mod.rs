// Rolling-window sequence predictor
pub mod predictor;

// Stake/exit recommendation mapping
pub mod advisor;

// Polling loop orchestrator
pub mod engine;
