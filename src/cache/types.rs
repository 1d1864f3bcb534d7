use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A cached value with its absolute expiry and approximate size.
pub struct CacheEntry {
    /// Serialized snapshot bytes.
    pub value: Vec<u8>,
    /// Entry is a hit only while `now < expiry`.
    pub expiry: DateTime<Utc>,
    /// Approximate size in bytes (the serialized length).
    pub size: u64,
}

impl CacheEntry {
    pub fn new(value: Vec<u8>, expiry: DateTime<Utc>) -> Self {
        let size = value.len() as u64;
        Self {
            value,
            expiry,
            size,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Live snapshot of cache occupancy.
pub struct CacheStats {
    pub current_size_bytes: u64,
    pub max_size_bytes: u64,
    pub item_count: usize,
    /// Entries still resident but past expiry (removed lazily on access).
    pub expired_count: usize,
    pub size_used_percentage: f64,
    /// `false` when the store runs without a persisted tier.
    pub persistent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Outcome of a cache read, for logging and stats.
pub enum CacheStatus {
    Hit,
    Expired,
    Miss,
}

impl CacheStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Expired => "EXPIRED",
            CacheStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
