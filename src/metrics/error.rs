use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// The metrics provider could not produce a bundle.
pub enum MetricsError {
    /// Required signals are absent from the metadata.
    #[error("metrics unavailable: missing required signals {missing:?}")]
    MissingSignals { missing: Vec<String> },

    /// A signal is present but not numeric.
    #[error("signal '{name}' must be a number, got {found}")]
    InvalidSignal { name: String, found: String },

    /// Provider-specific failure.
    #[error("metrics provider failed: {reason}")]
    ProviderFailed { reason: String },
}

pub type MetricsResult<T> = Result<T, MetricsError>;
