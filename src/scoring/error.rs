use thiserror::Error;

use super::types::Criterion;

#[derive(Debug, Clone, PartialEq, Error)]
/// Errors returned by the score calculator.
pub enum ScoringError {
    /// Weight table does not sum to 1.0 within tolerance (configuration error).
    #[error("weights must sum to 1.0, got {sum:.6}")]
    InvalidWeightSum {
        /// Observed sum.
        sum: f64,
    },

    /// A single weight is negative or not finite (configuration error).
    #[error("weight for {criterion} must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Offending criterion.
        criterion: Criterion,
        /// Offending weight.
        weight: f64,
    },

    /// Final score requested without all five criteria.
    #[error("missing required criteria: {missing:?}")]
    MissingCriteria {
        /// Criteria absent from the score map.
        missing: Vec<Criterion>,
    },

    /// A criterion score is NaN or infinite.
    #[error("score for {criterion} is not a finite number")]
    NonFiniteScore {
        /// Offending criterion.
        criterion: Criterion,
    },
}

impl ScoringError {
    /// Returns `true` for weight-table problems, which are fatal at startup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScoringError::InvalidWeightSum { .. } | ScoringError::InvalidWeight { .. }
        )
    }
}
