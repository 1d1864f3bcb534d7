//! Rating orchestrator.
//!
//! ```text
//! Received -> CacheCheck -> Hit (fresh)            -> Done
//!                        -> Hit (stale) | Miss     -> Validate -> Normalize
//!                                                  -> MetricsGathering -> Scoring
//!                                                  -> CacheWrite -> Done
//! ```
//!
//! Any failing step ends the request with a [`RatingError`]; nothing is cached for it.
//! Cache health never affects the result: an unreadable snapshot is a miss and
//! persistence failures are only logged.

pub mod config;
pub mod error;
pub mod service;
pub mod stats;


pub use config::RatingConfig;
pub use error::RatingError;
pub use service::{BatchReport, BatchSkip, RatingService};
pub use stats::{RatingStats, RatingStatsSnapshot};
