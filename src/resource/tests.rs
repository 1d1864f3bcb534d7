use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use serde_json::{Map, json};

use super::*;
use crate::scoring::{Criterion, ScoringError};

fn sample() -> Resource {
    Resource::new(
        ResourceId::derive("Rust Ownership", "https://example.com/rust"),
        "Rust Ownership",
        "Jane Doe",
        "https://example.com/rust",
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        ResourceMetadata::new(vec!["rust".into()], "programming", "en"),
        "Ownership rules. Borrowing rules.",
    )
}

fn fill_scores(resource: &mut Resource, score: f64) {
    for criterion in Criterion::ALL {
        resource.update_score(criterion, score);
    }
}

#[test]
fn test_derived_id_is_deterministic() {
    let a = ResourceId::derive("Title", "https://Example.com/a");
    let b = ResourceId::derive(" Title ", "https://example.com/a ");
    let c = ResourceId::derive("Other", "https://example.com/a");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.as_str().len(), 16);
}

#[test]
fn test_input_prefers_supplied_id() {
    let input = ResourceInput::new()
        .id("custom-1")
        .title("T")
        .url("https://example.com");
    assert_eq!(input.resource_id(), ResourceId::new("custom-1"));

    let derived = ResourceInput::new().title("T").url("https://example.com");
    assert_eq!(derived.resource_id(), ResourceId::derive("T", "https://example.com"));
}

#[test]
fn test_update_score_clamps() {
    let mut resource = sample();
    resource.update_score(Criterion::Relevance, 14.0);
    resource.update_score(Criterion::Authority, -2.0);
    resource.update_score(Criterion::Impact, f64::NAN);

    assert_eq!(resource.score(Criterion::Relevance), Some(10.0));
    assert_eq!(resource.score(Criterion::Authority), Some(0.0));
    assert_eq!(resource.score(Criterion::Impact), Some(0.0));
}

#[test]
fn test_final_score_requires_all_criteria() {
    let mut resource = sample();
    resource.update_score(Criterion::Relevance, 5.0);

    let err = resource
        .set_final_score(5.0, Map::new(), Utc::now())
        .unwrap_err();
    assert!(matches!(err, ScoringError::MissingCriteria { .. }));
    assert!(!resource.is_rated());
    assert!(resource.last_rated().is_none());
}

#[test]
fn test_final_score_is_clamped_and_provenance_merged() {
    let mut resource = sample();
    fill_scores(&mut resource, 0.0);

    let mut provenance = Map::new();
    provenance.insert("review_count".into(), json!(3));
    let now = Utc::now();
    resource.set_final_score(0.2, provenance, now).unwrap();

    assert_eq!(resource.final_score(), Some(1.0));
    assert_eq!(resource.last_rated(), Some(now));
    assert_eq!(resource.rating_metadata()["review_count"], json!(3));
    assert!(resource.is_well_formed());
}

#[test]
fn test_staleness() {
    let mut resource = sample();
    let day = Duration::from_secs(86_400);
    assert!(resource.is_stale(day));

    fill_scores(&mut resource, 5.0);
    let rated_at = Utc::now();
    resource.set_final_score(5.0, Map::new(), rated_at).unwrap();

    assert!(!resource.is_stale_at(rated_at + TimeDelta::hours(23), day));
    assert!(!resource.is_stale_at(rated_at + TimeDelta::hours(24), day));
    assert!(resource.is_stale_at(rated_at + TimeDelta::hours(25), day));
}

#[test]
fn test_reset_rating() {
    let mut resource = sample();
    fill_scores(&mut resource, 5.0);
    resource.set_final_score(5.0, Map::new(), Utc::now()).unwrap();

    resource.reset_rating();

    assert!(resource.scores().is_empty());
    assert!(!resource.is_rated());
    assert!(resource.to_rating_result().is_none());
}

#[test]
fn test_rating_result_shape() {
    let mut resource = sample();
    assert!(resource.to_rating_result().is_none());

    fill_scores(&mut resource, 8.0);
    resource.set_final_score(8.0, Map::new(), Utc::now()).unwrap();

    let result = resource.to_rating_result().unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["resource_id"], json!(resource.id().as_str()));
    assert_eq!(value["title"], json!("Rust Ownership"));
    assert_eq!(value["final_score"], json!(8.0));
    for criterion in Criterion::ALL {
        assert_eq!(value["scores"][criterion.as_str()], json!(8.0));
    }
    assert!(value["rating_timestamp"].is_string());
}

#[test]
fn test_snapshot_serde_preserves_entity() {
    let mut resource = sample();
    resource.metadata = resource
        .metadata
        .clone()
        .with("view_count", 100)
        .with("has_cta", false);
    fill_scores(&mut resource, 6.5);
    resource.set_final_score(6.5, Map::new(), Utc::now()).unwrap();

    let bytes = serde_json::to_vec(&resource).unwrap();
    let restored: Resource = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(restored, resource);
    assert_eq!(restored.metadata.number("view_count"), Some(100.0));
    assert!(!restored.metadata.has_cta());
}

#[test]
fn test_malformed_snapshot_detected() {
    let mut resource = sample();
    fill_scores(&mut resource, 5.0);
    resource.set_final_score(5.0, Map::new(), Utc::now()).unwrap();

    let mut value = serde_json::to_value(&resource).unwrap();
    value["final_score"] = json!(0.0);
    let restored: Resource = serde_json::from_value(value).unwrap();

    assert!(!restored.is_well_formed());
}

#[test]
fn test_metadata_defaults() {
    let meta = ResourceMetadata::new(Vec::new(), "c", "en");
    assert_eq!(meta.review_count(), 0);
    assert!(meta.has_cta());

    let meta = meta.with("review_count", 750).with("has_cta", false);
    assert_eq!(meta.review_count(), 750);
    assert!(!meta.has_cta());

    let meta = ResourceMetadata::default().with("review_count", -4);
    assert_eq!(meta.review_count(), 0);
}

#[test]
fn test_rating_input_identity() {
    let resource = sample();
    let id = resource.id().clone();

    assert_eq!(RatingInput::from(resource).resource_id(), id);
}
