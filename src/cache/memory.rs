//! In-memory tier: an arena of entry slots with an expiry-ordered eviction queue.
//!
//! Keys map to slot indices; freed slots are recycled. The eviction queue orders
//! slots by `(expiry, insertion sequence)` so the soonest-to-expire entry is always
//! the first key, and the aggregate size is tracked incrementally instead of being
//! recomputed on every write.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::types::CacheEntry;

type QueueKey = (DateTime<Utc>, u64);

#[derive(Debug)]
struct Slot {
    key: String,
    entry: CacheEntry,
    queue_key: QueueKey,
}

/// Slot arena keyed by cache key.
#[derive(Debug, Default)]
pub struct EntryArena {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    eviction_queue: BTreeMap<QueueKey, usize>,
    current_size: u64,
    next_seq: u64,
}

impl EntryArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            ..Default::default()
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        let slot = *self.index.get(key)?;
        self.slots[slot].as_ref().map(|s| &s.entry)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces `key`, returning the previous entry if any.
    pub fn insert(&mut self, key: String, entry: CacheEntry) -> Option<CacheEntry> {
        let queue_key = (entry.expiry, self.next_seq);
        self.next_seq += 1;
        self.current_size += entry.size;

        if let Some(&slot_idx) = self.index.get(&key)
            && let Some(slot) = self.slots[slot_idx].as_mut()
        {
            self.eviction_queue.remove(&slot.queue_key);
            self.eviction_queue.insert(queue_key, slot_idx);
            slot.queue_key = queue_key;
            let previous = std::mem::replace(&mut slot.entry, entry);
            self.current_size -= previous.size;
            return Some(previous);
        }

        let slot = Slot {
            key: key.clone(),
            entry,
            queue_key,
        };
        let slot_idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        self.index.insert(key, slot_idx);
        self.eviction_queue.insert(queue_key, slot_idx);
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let slot_idx = self.index.remove(key)?;
        self.release(slot_idx).map(|(_, entry)| entry)
    }

    /// Removes and returns the entry with the earliest expiry.
    pub fn pop_soonest_expiring(&mut self) -> Option<(String, CacheEntry)> {
        let (_, slot_idx) = self.eviction_queue.pop_first()?;
        let (key, entry) = self.release_unqueued(slot_idx)?;
        self.index.remove(&key);
        Some((key, entry))
    }

    /// Keys whose expiry is at or before `now`, soonest first.
    pub fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String> {
        self.eviction_queue
            .range(..=(now, u64::MAX))
            .filter_map(|(_, &idx)| self.slots[idx].as_ref().map(|s| s.key.clone()))
            .collect()
    }

    pub fn expired_count(&self, now: DateTime<Utc>) -> usize {
        self.eviction_queue.range(..=(now, u64::MAX)).count()
    }

    #[inline]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.eviction_queue.clear();
        self.current_size = 0;
    }

    /// Iterates live entries in eviction order (soonest expiry first).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.eviction_queue.values().filter_map(|&idx| {
            self.slots[idx]
                .as_ref()
                .map(|s| (s.key.as_str(), &s.entry))
        })
    }

    fn release(&mut self, slot_idx: usize) -> Option<(String, CacheEntry)> {
        let queue_key = self.slots[slot_idx].as_ref()?.queue_key;
        self.eviction_queue.remove(&queue_key);
        self.release_unqueued(slot_idx)
    }

    fn release_unqueued(&mut self, slot_idx: usize) -> Option<(String, CacheEntry)> {
        let slot = self.slots[slot_idx].take()?;
        self.free.push(slot_idx);
        self.current_size -= slot.entry.size;
        Some((slot.key, slot.entry))
    }
}
