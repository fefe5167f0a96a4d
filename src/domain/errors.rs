use thiserror::Error;

/// Errors raised at the history boundary
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid crash multiplier {value}: must be > 1.0")]
    InvalidMultiplier { value: f64 },
}

/// Errors raised by the predictor
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Not enough history to train: {observed} rounds observed, {required} required")]
    NotReady { observed: usize, required: usize },

    #[error("Training failed: {reason}")]
    Training { reason: String },

    #[error("Model serialization failed: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_formatting() {
        let err = HistoryError::InvalidMultiplier { value: 0.97 };
        let msg = err.to_string();
        assert!(msg.contains("0.97"));
        assert!(msg.contains("> 1.0"));
    }

    #[test]
    fn test_not_ready_formatting() {
        let err = PredictorError::NotReady {
            observed: 4,
            required: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains("10"));
    }
}
