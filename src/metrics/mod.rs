//! Metrics provider contract and bundle types.
//!
//! The rating pipeline consumes a [`MetricsBundle`] per resource. How the bundle is
//! produced is behind [`MetricsProvider`]; [`SignalMetricsProvider`] derives it from
//! numeric metadata signals plus a [`TextAnalyzer`] over the normalized content.

pub mod error;
pub mod provider;
pub mod text;
pub mod types;


pub use error::{MetricsError, MetricsResult};
#[cfg(any(test, feature = "mock"))]
pub use provider::MockMetricsProvider;
pub use provider::{MetricsProvider, REQUIRED_SIGNALS, SignalMetricsProvider, read_signal};
pub use text::{BasicTextAnalyzer, TextAnalyzer, count_syllables, flesch_reading_ease};
pub use types::{
    AuthorityMetrics, EngagementMetrics, ImpactMetrics, KeywordFrequency, MetricsBundle,
    TextAnalysis,
};
