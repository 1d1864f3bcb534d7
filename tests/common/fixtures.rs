//! Test fixtures for integration tests.

use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};

use ratewise::{
    CacheConfig, CacheStoreHandle, RatingConfig, RatingService, ResourceInput, ScoreCalculator,
    SignalMetricsProvider,
};

pub const DEFAULT_AUTHOR: &str = "Jane Doe";

pub const DEFAULT_DATE: &str = "2024-01-15T10:30:00Z";

pub const SAMPLE_CONTENT: &str = "Rust guarantees memory safety without a garbage collector. \
     Ownership rules are checked at compile time. Borrowing lets code share data safely.";

/// Metadata with every engagement, authority and impact signal populated.
pub fn signal_metadata() -> Value {
    json!({
        "keywords": ["rust", "ownership", "memory"],
        "category": "programming",
        "language": "en",
        "view_count": 1000,
        "total_interactions": 150,
        "avg_interaction_time": 30,
        "social_shares": 25,
        "citations": 40,
        "author_credentials_score": 7.5,
        "domain_authority": 8,
        "positive_outcomes": 6,
        "conversion_rate": 0.4,
        "user_satisfaction": 8.5,
        "review_count": 120
    })
}

/// A valid raw input whose URL is derived from `title`.
pub fn resource_input(title: &str) -> ResourceInput {
    let slug = title.to_lowercase().replace(' ', "-");
    ResourceInput::new()
        .title(title)
        .content(SAMPLE_CONTENT)
        .author(DEFAULT_AUTHOR)
        .url(format!("https://example.com/articles/{}", slug))
        .publication_date(DEFAULT_DATE)
        .metadata(signal_metadata())
}

pub fn cache_config(dir: &Path) -> CacheConfig {
    CacheConfig::persistent(dir)
        .max_size_bytes(1024 * 1024)
        .default_ttl(Duration::from_secs(3600))
}

pub fn persistent_service(dir: &Path) -> RatingService<SignalMetricsProvider> {
    service_on(CacheStoreHandle::open(cache_config(dir)))
}

pub fn service_on(cache: CacheStoreHandle) -> RatingService<SignalMetricsProvider> {
    RatingService::new(
        cache,
        SignalMetricsProvider::new(),
        ScoreCalculator::standard(),
        RatingConfig::default(),
    )
}
