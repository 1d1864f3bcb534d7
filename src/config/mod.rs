//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RATEWISE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_CACHE_MAX_BYTES, DEFAULT_RATING_TTL_SECS};
use crate::rating::RatingConfig;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RATEWISE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory for the persisted rating cache. Default: `./.cache`.
    pub cache_dir: PathBuf,

    /// Cache byte budget. Default: 100 MiB.
    pub cache_max_bytes: u64,

    /// TTL of cached ratings, in seconds. Default: `86400`.
    pub cache_ttl_secs: u64,

    /// Age after which a cached rating is recomputed, in seconds. Default: `86400`.
    pub max_rating_age_secs: u64,

    /// Chunk size for batch rating. Default: `10`.
    pub batch_size: usize,
}

/// Default cache directory used when `RATEWISE_CACHE_DIR` is not set.
pub const DEFAULT_CACHE_DIR: &str = "./.cache";

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_max_bytes: DEFAULT_CACHE_MAX_BYTES,
            cache_ttl_secs: DEFAULT_RATING_TTL_SECS,
            max_rating_age_secs: DEFAULT_RATING_TTL_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    pub const ENV_CACHE_DIR: &'static str = "RATEWISE_CACHE_DIR";
    pub const ENV_CACHE_MAX_BYTES: &'static str = "RATEWISE_CACHE_MAX_BYTES";
    pub const ENV_CACHE_TTL_SECS: &'static str = "RATEWISE_CACHE_TTL_SECS";
    pub const ENV_MAX_RATING_AGE_SECS: &'static str = "RATEWISE_MAX_RATING_AGE_SECS";
    pub const ENV_BATCH_SIZE: &'static str = "RATEWISE_BATCH_SIZE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_dir = Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir);
        let cache_max_bytes =
            Self::parse_u64_from_env(Self::ENV_CACHE_MAX_BYTES, defaults.cache_max_bytes)?;
        let cache_ttl_secs =
            Self::parse_u64_from_env(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl_secs)?;
        let max_rating_age_secs =
            Self::parse_u64_from_env(Self::ENV_MAX_RATING_AGE_SECS, defaults.max_rating_age_secs)?;
        let batch_size =
            Self::parse_u64_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size as u64)? as usize;

        Ok(Self {
            cache_dir,
            cache_max_bytes,
            cache_ttl_secs,
            max_rating_age_secs,
            batch_size,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        if self.cache_max_bytes == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_CACHE_MAX_BYTES,
            });
        }

        if self.batch_size == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_BATCH_SIZE,
            });
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn max_rating_age(&self) -> Duration {
        Duration::from_secs(self.max_rating_age_secs)
    }

    /// Settings for the persisted cache store.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::persistent(&self.cache_dir)
            .max_size_bytes(self.cache_max_bytes)
            .default_ttl(self.cache_ttl())
    }

    /// Settings for the rating orchestrator.
    pub fn rating_config(&self) -> RatingConfig {
        RatingConfig::default()
            .with_cache_ttl(self.cache_ttl())
            .with_max_age(self.max_rating_age())
            .with_batch_size(self.batch_size)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value: value.clone(),
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
