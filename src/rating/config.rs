use std::time::Duration;

use crate::constants::{DEFAULT_BATCH_SIZE, default_rating_ttl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Orchestrator settings.
pub struct RatingConfig {
    /// TTL of each cache write.
    pub cache_ttl: Duration,
    /// Age after which a cached rating is recomputed.
    pub max_age: Duration,
    /// Default chunk size for [`rate_batch`](super::RatingService::rate_batch) callers.
    pub batch_size: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_rating_ttl(),
            max_age: default_rating_ttl(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RatingConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
