//! Cross-cutting, shared constants.
//!
//! The staleness window and the cache TTL share one default so that a cached rating
//! expires from the store at the same moment the orchestrator would consider it stale.

use std::time::Duration;

/// Default rating TTL / staleness window in seconds (24 hours).
pub const DEFAULT_RATING_TTL_SECS: u64 = 24 * 60 * 60;

/// Default cache byte budget (100 MiB).
pub const DEFAULT_CACHE_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Default chunk size for batch rating.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Name of the persisted cache index inside the cache directory.
pub const CACHE_INDEX_FILENAME: &str = "cache_index.json";

/// Extension used for per-key cache data files.
pub const CACHE_DATA_EXTENSION: &str = "json";

/// Allowed deviation of the weight-table sum from `1.0`.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

/// Review count at which the statistical-significance bonus applies.
pub const REVIEW_COUNT_BONUS_THRESHOLD: u64 = 500;

/// Normalization ceiling used when mapping a metrics bundle to criterion scores.
pub const DEFAULT_CRITERION_MAX: f64 = 10.0;

/// Returns [`DEFAULT_RATING_TTL_SECS`] as a [`Duration`].
#[inline]
pub fn default_rating_ttl() -> Duration {
    Duration::from_secs(DEFAULT_RATING_TTL_SECS)
}
