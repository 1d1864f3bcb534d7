use thiserror::Error;

use crate::metrics::MetricsError;
use crate::processing::ValidationError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
/// Why a single rating request failed. Cache problems never appear here.
pub enum RatingError {
    /// Input rejected before any work was done.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The metrics provider could not produce a bundle; nothing was cached.
    #[error(transparent)]
    MetricsUnavailable(#[from] MetricsError),

    /// Score computation rejected its inputs.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl RatingError {
    /// Short label for logs and batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RatingError::Validation(_) => "validation",
            RatingError::MetricsUnavailable(_) => "metrics_unavailable",
            RatingError::Scoring(_) => "scoring",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RatingError::Validation(_))
    }
}
