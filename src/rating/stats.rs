use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Request counters owned by whoever constructs the orchestrator.
///
/// Share one instance across services with `Arc` to aggregate.
#[derive(Debug, Default)]
pub struct RatingStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    stale_hits: AtomicU64,
    corrupt_snapshots: AtomicU64,
    computations: AtomicU64,
    failures: AtomicU64,
    batch_skips: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
/// Point-in-time copy of [`RatingStats`].
pub struct RatingStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub stale_hits: u64,
    pub corrupt_snapshots: u64,
    pub computations: u64,
    pub failures: u64,
    pub batch_skips: u64,
}

impl RatingStatsSnapshot {
    /// Fraction of requests served from cache; `0` before any request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.requests as f64
        }
    }
}

impl RatingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_corrupt(&self) {
        self.corrupt_snapshots.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_computation(&self) {
        self.computations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_batch_skip(&self) {
        self.batch_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RatingStatsSnapshot {
        RatingStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            corrupt_snapshots: self.corrupt_snapshots.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            batch_skips: self.batch_skips.load(Ordering::Relaxed),
        }
    }
}
