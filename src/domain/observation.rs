use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed game round: the multiplier at which the round crashed.
///
/// Immutable once recorded. Multipliers are always strictly greater than 1.0;
/// validation happens at the history boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}
