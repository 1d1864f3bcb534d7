//! Rating cache: in-memory arena + persisted directory, TTL expiry and a byte budget.
//!
//! - [`memory`] holds entries in a slot arena with an expiry-ordered eviction queue.
//! - [`disk`] persists an index plus one data file per key.
//! - [`store`] combines both under a single lock ([`CacheStore`]).
//!
//! # Eviction
//!
//! When the aggregate entry size exceeds the budget, entries are removed in ascending
//! expiry order (soonest-to-expire first) until the store is back under budget. This
//! keeps the entries with the longest remaining life, regardless of how often they
//! are read or how large they are.

pub mod config;
pub mod disk;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

#[cfg(test)]
mod store_tests;

pub use config::CacheConfig;
pub use disk::{CacheIndex, DiskTier, IndexRecord};
pub use error::{CacheError, CacheResult};
pub use memory::EntryArena;
pub use store::{CacheStore, CacheStoreHandle};
pub use types::{CacheEntry, CacheStats, CacheStatus};
