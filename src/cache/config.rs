use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_MAX_BYTES, default_rating_ttl};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Configuration for a [`CacheStore`](super::CacheStore).
pub struct CacheConfig {
    /// Directory for the persisted tier. `None` keeps the store memory-only.
    pub cache_dir: Option<PathBuf>,
    /// Byte budget for the aggregate size of all entries.
    pub max_size_bytes: u64,
    /// TTL applied by [`CacheStore::insert`](super::CacheStore::insert).
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: Some(PathBuf::from("./.cache")),
            max_size_bytes: DEFAULT_CACHE_MAX_BYTES,
            default_ttl: default_rating_ttl(),
        }
    }
}

impl CacheConfig {
    /// Persisted configuration rooted at `dir`.
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Memory-only configuration.
    pub fn in_memory() -> Self {
        Self {
            cache_dir: None,
            ..Default::default()
        }
    }

    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}
