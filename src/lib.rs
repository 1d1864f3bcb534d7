//! Ratewise library crate (used by the CLI and integration tests).
//!
//! Computes a 1-10 quality rating for a content resource from engagement,
//! authority and impact signals, and memoizes it in a TTL- and size-bounded cache
//! that survives restarts.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RatingService`] - cache lookup, staleness check, metrics, scoring, cache write
//! - [`RatingInput`], [`ResourceInput`], [`Resource`], [`RatingResult`] - inputs and results
//! - [`RatingStats`] - injectable request counters
//!
//! ## Components
//! - [`CacheStore`], [`CacheStoreHandle`] - persisted key/value cache
//! - [`ScoreCalculator`], [`WeightTable`] - criterion and final scores
//! - [`MetricsProvider`], [`SignalMetricsProvider`] - metrics bundle contract
//! - [`ContentExtractor`], [`PlainTextExtractor`] - plain-text extraction
//!
//! ## Configuration
//! - [`Config`] - `RATEWISE_*` environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod extract;
pub mod hashing;
pub mod metrics;
pub mod processing;
pub mod rating;
pub mod resource;
pub mod scoring;

pub use cache::{CacheConfig, CacheError, CacheStats, CacheStatus, CacheStore, CacheStoreHandle};
pub use config::{Config, ConfigError};
pub use extract::{
    ContentExtractor, ContentFormat, ExtractionError, PlainTextExtractor, detect_format,
};
pub use hashing::{cache_file_stem, hash_cache_key, hash_resource_identity};
#[cfg(any(test, feature = "mock"))]
pub use metrics::MockMetricsProvider;
pub use metrics::{
    BasicTextAnalyzer, MetricsBundle, MetricsError, MetricsProvider, SignalMetricsProvider,
    TextAnalyzer,
};
pub use processing::{ValidationError, ValidationReport};
pub use rating::{
    BatchReport, BatchSkip, RatingConfig, RatingError, RatingService, RatingStats,
    RatingStatsSnapshot,
};
pub use resource::{RatingInput, RatingResult, Resource, ResourceId, ResourceInput, ResourceMetadata};
pub use scoring::{Criterion, CriterionScores, ScoreCalculator, ScoringError, WeightTable};
