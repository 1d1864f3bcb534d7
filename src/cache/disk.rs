//! Persisted tier (simple file-per-entry layout plus a JSON index).
//!
//! Layout inside the cache directory:
//! - `cache_index.json`: `{ "<key>": { "expiry": "<RFC 3339>", "size": <bytes> } }`
//! - `<stem>.json`: one serialized snapshot per key, where `stem` is
//!   [`cache_file_stem`](crate::hashing::cache_file_stem) of the key.
//!
//! Every write goes to a `.tmp` sibling first and is renamed into place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CacheError, CacheResult};
use crate::constants::{CACHE_DATA_EXTENSION, CACHE_INDEX_FILENAME};
use crate::hashing::{FILE_STEM_HEX_LEN, cache_file_stem};

const TEMP_EXTENSION: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Index metadata for one key.
pub struct IndexRecord {
    pub expiry: DateTime<Utc>,
    pub size: u64,
}

/// Persisted index: key to expiry and size.
pub type CacheIndex = BTreeMap<String, IndexRecord>;

#[derive(Debug, Clone)]
/// Reads and writes the persisted cache directory.
pub struct DiskTier {
    dir: PathBuf,
}

impl DiskTier {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if it does not exist.
    pub fn ensure_dir(&self) -> CacheResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;
        }
        Ok(())
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(CACHE_INDEX_FILENAME)
    }

    pub fn data_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", cache_file_stem(key), CACHE_DATA_EXTENSION))
    }

    /// Reads the index. Returns `Ok(None)` when no index has been written yet.
    pub fn read_index(&self) -> CacheResult<Option<CacheIndex>> {
        let path = self.index_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| CacheError::Corruption {
                path,
                reason: e.to_string(),
            })
    }

    pub fn write_index(&self, index: &CacheIndex) -> CacheResult<()> {
        let bytes = serde_json::to_vec(index)?;
        self.write_atomic(&self.index_path(), &bytes)
    }

    /// Reads the data file for `key`.
    ///
    /// Returns `Ok(None)` if the file is missing and [`CacheError::Corruption`] if it
    /// is not well-formed JSON.
    pub fn read_value(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let path = self.data_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, e)),
        };

        serde_json::from_slice::<serde::de::IgnoredAny>(&bytes).map_err(|e| {
            CacheError::Corruption {
                path,
                reason: e.to_string(),
            }
        })?;

        Ok(Some(bytes))
    }

    pub fn write_value(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        self.write_atomic(&self.data_path(key), value)
    }

    /// Removes the data file for `key`. Missing files are not an error.
    pub fn remove_value(&self, key: &str) -> CacheResult<()> {
        let path = self.data_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    /// Removes the index, every data file and any leftover temp files.
    ///
    /// Only names this tier produces are touched (see [`is_cache_file_name`]); other
    /// files in the directory are left alone. Returns the number of files removed.
    pub fn clear(&self) -> CacheResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir).map_err(|e| CacheError::io(&self.dir, e))? {
            let entry = entry.map_err(|e| CacheError::io(&self.dir, e))?;
            let path = entry.path();

            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
                && is_cache_file_name(name)
            {
                fs::remove_file(&path).map_err(|e| CacheError::io(&path, e))?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> CacheResult<()> {
        let temp_path = path.with_extension(TEMP_EXTENSION);

        {
            let mut file = File::create(&temp_path).map_err(|e| CacheError::io(&temp_path, e))?;
            file.write_all(bytes)
                .map_err(|e| CacheError::io(&temp_path, e))?;
        }

        fs::rename(&temp_path, path).map_err(|e| CacheError::io(path, e))
    }
}

/// Whether `name` is the index, its temp file, or a data/temp file named by
/// [`cache_file_stem`].
pub fn is_cache_file_name(name: &str) -> bool {
    if name == CACHE_INDEX_FILENAME || Path::new(name) == index_temp_name() {
        return true;
    }

    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    (ext == CACHE_DATA_EXTENSION || ext == TEMP_EXTENSION)
        && stem.len() == FILE_STEM_HEX_LEN
        && stem.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn index_temp_name() -> PathBuf {
    Path::new(CACHE_INDEX_FILENAME).with_extension(TEMP_EXTENSION)
}
