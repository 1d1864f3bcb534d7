use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by the persisted cache tier.
///
/// These never escape [`CacheStore`](super::CacheStore)'s public operations: the store
/// logs them and keeps serving from memory.
pub enum CacheError {
    /// Reading or writing a cache file failed (permissions, disk full, ...).
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted index or data file could not be parsed.
    #[error("corrupt cache data at {path}: {reason}")]
    Corruption {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The in-memory index could not be serialized.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for [`CacheError::Corruption`].
    pub fn is_corruption(&self) -> bool {
        matches!(self, CacheError::Corruption { .. })
    }
}

/// Convenience result type for cache persistence.
pub type CacheResult<T> = Result<T, CacheError>;
