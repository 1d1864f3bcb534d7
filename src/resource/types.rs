use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hashing::hash_resource_identity;

/// Metadata key holding the number of reviews behind a resource.
pub const META_REVIEW_COUNT: &str = "review_count";
/// Metadata key holding the call-to-action flag.
pub const META_HAS_CTA: &str = "has_cta";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable, content-derived key of a resource; also its cache key.
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the id from title and canonical (trimmed, lower-cased) URL.
    pub fn derive(title: &str, url: &str) -> Self {
        Self(hash_resource_identity(
            title.trim(),
            &url.trim().to_lowercase(),
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Typed view of a resource's metadata: the three descriptive fields plus free-form
/// signals (`view_count`, `citations`, `review_count`, `has_cta`, ...).
pub struct ResourceMetadata {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceMetadata {
    pub fn new(keywords: Vec<String>, category: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            keywords,
            category: category.into(),
            language: language.into(),
            extra: Map::new(),
        }
    }

    /// Sets a free-form field, returning `self` for chaining.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Numeric value of a free-form field, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    /// `review_count`, defaulting to 0. Negative or fractional values are truncated at 0.
    pub fn review_count(&self) -> u64 {
        match self.extra.get(META_REVIEW_COUNT) {
            Some(v) => v
                .as_u64()
                .or_else(|| v.as_f64().map(|f| f.max(0.0) as u64))
                .unwrap_or(0),
            None => 0,
        }
    }

    /// `has_cta`, defaulting to `true`.
    pub fn has_cta(&self) -> bool {
        self.extra
            .get(META_HAS_CTA)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}
