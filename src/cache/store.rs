//! Two-tier cache store: the in-memory arena backed by a persisted directory.
//!
//! Every operation runs under one mutex, so operations on a store are linearizable.
//! Persistence failures are logged and never surface to callers: the in-memory tier
//! keeps serving and, if the directory is unusable at open, the store runs
//! memory-only.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use super::config::CacheConfig;
use super::disk::{CacheIndex, DiskTier, IndexRecord};
use super::memory::EntryArena;
use super::types::{CacheEntry, CacheStats, CacheStatus};

#[derive(Debug)]
struct StoreInner {
    arena: EntryArena,
    disk: Option<DiskTier>,
}

/// TTL-bounded, size-bounded key/value store with a persisted backing directory.
pub struct CacheStore {
    inner: Mutex<StoreInner>,
    max_size_bytes: u64,
    default_ttl: Duration,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CacheStore")
            .field("entries", &inner.arena.len())
            .field("current_size", &inner.arena.current_size())
            .field("max_size_bytes", &self.max_size_bytes)
            .field("dir", &inner.disk.as_ref().map(|d| d.dir().to_path_buf()))
            .finish()
    }
}

impl CacheStore {
    /// Opens a store, rehydrating any persisted entries that have not expired.
    ///
    /// Never fails: an unreadable or corrupt index yields an empty cache, and an
    /// unusable directory yields a memory-only store.
    #[instrument(skip(config), fields(dir = ?config.cache_dir, max_size_bytes = config.max_size_bytes))]
    pub fn open(config: CacheConfig) -> Self {
        let disk = config.cache_dir.map(DiskTier::new).and_then(|disk| {
            match disk.ensure_dir() {
                Ok(()) => Some(disk),
                Err(e) => {
                    warn!(error = %e, "Cache directory unavailable, running memory-only");
                    None
                }
            }
        });

        let mut inner = StoreInner {
            arena: EntryArena::new(),
            disk,
        };

        if let Some(disk) = inner.disk.as_ref() {
            let loaded = rehydrate(disk, &mut inner.arena, Utc::now());
            info!(entries = loaded, "Cache rehydrated from disk");
        }

        let store = Self {
            inner: Mutex::new(inner),
            max_size_bytes: config.max_size_bytes,
            default_ttl: config.default_ttl,
        };

        {
            let mut inner = store.inner.lock();
            store.evict_over_budget(&mut inner);
            persist_index(&inner);
        }

        store
    }

    /// Memory-only store with the given byte budget.
    pub fn in_memory(max_size_bytes: u64) -> Self {
        Self::open(CacheConfig::in_memory().max_size_bytes(max_size_bytes))
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn is_persistent(&self) -> bool {
        self.inner.lock().disk.is_some()
    }

    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry found here is removed from both tiers.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lookup(key).0
    }

    /// Like [`get`](Self::get), also reporting whether the key was a hit, expired, or absent.
    pub fn lookup(&self, key: &str) -> (Option<Vec<u8>>, CacheStatus) {
        let mut inner = self.inner.lock();
        let now = Utc::now();

        match inner.arena.get(key) {
            None => return (None, CacheStatus::Miss),
            Some(entry) if !entry.is_expired_at(now) => {
                return (Some(entry.value.clone()), CacheStatus::Hit);
            }
            Some(_) => {}
        }

        debug!(key, "Removing expired cache entry");
        inner.arena.remove(key);
        remove_persisted(&inner, key);
        persist_index(&inner);

        (None, CacheStatus::Expired)
    }

    /// Stores `value` under `key` with the store's default TTL.
    pub fn insert(&self, key: &str, value: Vec<u8>) {
        self.put(key, value, self.default_ttl);
    }

    /// Stores `value` under `key`, expiring `ttl` from now, then evicts if over budget.
    pub fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let expiry = expiry_after(Utc::now(), ttl);
        let mut inner = self.inner.lock();

        if let Some(disk) = inner.disk.as_ref()
            && let Err(e) = disk.write_value(key, &value)
        {
            warn!(key, error = %e, "Failed to persist cache entry, keeping it in memory only");
            // A previous blob must not be rehydrated under the new expiry.
            if let Err(e) = disk.remove_value(key) {
                warn!(key, error = %e, "Failed to remove superseded cache file");
            }
        }

        let size = value.len();
        inner
            .arena
            .insert(key.to_string(), CacheEntry::new(value, expiry));
        debug!(key, size, %expiry, "Cache entry stored");

        self.evict_over_budget(&mut inner);
        persist_index(&inner);
    }

    /// Removes `key` from both tiers. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        let mut inner = self.inner.lock();
        let removed = inner.arena.remove(key).is_some();
        remove_persisted(&inner, key);
        if removed {
            persist_index(&inner);
        }
    }

    /// Removes every entry from both tiers.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.arena.clear();

        if let Some(disk) = inner.disk.as_ref() {
            match disk.clear() {
                Ok(removed) => debug!(files = removed, "Cache directory cleared"),
                Err(e) => warn!(error = %e, "Failed to clear cache directory"),
            }
        }
    }

    /// Eagerly removes every expired entry and returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let expired = inner.arena.expired_keys(Utc::now());

        for key in &expired {
            inner.arena.remove(key);
            remove_persisted(&inner, key);
        }

        if !expired.is_empty() {
            persist_index(&inner);
            debug!(removed = expired.len(), "Swept expired cache entries");
        }

        expired.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().arena.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let current_size_bytes = inner.arena.current_size();
        let size_used_percentage = if self.max_size_bytes == 0 {
            0.0
        } else {
            current_size_bytes as f64 / self.max_size_bytes as f64 * 100.0
        };

        CacheStats {
            current_size_bytes,
            max_size_bytes: self.max_size_bytes,
            item_count: inner.arena.len(),
            expired_count: inner.arena.expired_count(Utc::now()),
            size_used_percentage,
            persistent: inner.disk.is_some(),
        }
    }

    fn evict_over_budget(&self, inner: &mut StoreInner) {
        let mut evicted = 0usize;

        while inner.arena.current_size() > self.max_size_bytes {
            let Some((key, entry)) = inner.arena.pop_soonest_expiring() else {
                break;
            };
            debug!(key = %key, size = entry.size, expiry = %entry.expiry, "Evicting cache entry");
            remove_persisted(inner, &key);
            evicted += 1;
        }

        if evicted > 0 {
            info!(
                evicted,
                current_size = inner.arena.current_size(),
                max_size = self.max_size_bytes,
                "Cache over budget, evicted soonest-expiring entries"
            );
        }
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn remove_persisted(inner: &StoreInner, key: &str) {
    if let Some(disk) = inner.disk.as_ref()
        && let Err(e) = disk.remove_value(key)
    {
        warn!(key, error = %e, "Failed to remove persisted cache entry");
    }
}

fn persist_index(inner: &StoreInner) {
    let Some(disk) = inner.disk.as_ref() else {
        return;
    };

    let index: CacheIndex = inner
        .arena
        .iter()
        .map(|(key, entry)| {
            (
                key.to_string(),
                IndexRecord {
                    expiry: entry.expiry,
                    size: entry.size,
                },
            )
        })
        .collect();

    if let Err(e) = disk.write_index(&index) {
        warn!(error = %e, "Failed to save cache index");
    }
}

/// Loads unexpired entries from `disk` into `arena`. Returns the number loaded.
fn rehydrate(disk: &DiskTier, arena: &mut EntryArena, now: DateTime<Utc>) -> usize {
    let index = match disk.read_index() {
        Ok(Some(index)) => index,
        Ok(None) => return 0,
        Err(e) => {
            warn!(error = %e, "Cache index unreadable, starting with an empty cache");
            if let Err(e) = disk.clear() {
                warn!(error = %e, "Failed to clear corrupt cache directory");
            }
            return 0;
        }
    };

    let mut loaded = 0;
    for (key, record) in index {
        if record.expiry <= now {
            if let Err(e) = disk.remove_value(&key) {
                warn!(key = %key, error = %e, "Failed to remove expired cache file");
            }
            continue;
        }

        match disk.read_value(&key) {
            Ok(Some(value)) => {
                arena.insert(key, CacheEntry::new(value, record.expiry));
                loaded += 1;
            }
            Ok(None) => debug!(key = %key, "Indexed cache entry has no data file, skipping"),
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping unreadable cache entry");
                if let Err(e) = disk.remove_value(&key) {
                    warn!(key = %key, error = %e, "Failed to remove unreadable cache file");
                }
            }
        }
    }

    loaded
}

#[derive(Clone, Debug)]
/// Shared handle to a [`CacheStore`].
pub struct CacheStoreHandle {
    inner: Arc<CacheStore>,
}

impl CacheStoreHandle {
    pub fn new(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Opens a store from `config` and wraps it in a handle.
    pub fn open(config: CacheConfig) -> Self {
        Self::new(CacheStore::open(config))
    }

    pub fn store(&self) -> &CacheStore {
        &self.inner
    }

    /// Returns the number of strong references to the underlying store.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl std::ops::Deref for CacheStoreHandle {
    type Target = CacheStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
