// Observed rounds and the bounded rolling history
pub mod history;
pub mod observation;

// Windowed feature derivation
pub mod features;

// Advisor output value objects
pub mod recommendation;

// Session-level aggregate statistics
pub mod metrics;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
