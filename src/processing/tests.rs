use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;
use crate::resource::{ResourceId, ResourceInput, ResourceMetadata};

fn valid_input() -> ResourceInput {
    ResourceInput::new()
        .title("Understanding Ownership")
        .content("Rust   uses ownership !It is checked at compile time...")
        .author("Jane Doe")
        .url("https://Example.com/Rust/Ownership")
        .publication_date("2024-01-15T10:30:00Z")
        .metadata(json!({
            "keywords": [" Rust ", "ownership", "RUST", ""],
            "category": " Programming ",
            "language": "EN",
            "view_count": 1200
        }))
}

#[test]
fn test_valid_input_passes() {
    let validated = validate_input(&valid_input()).unwrap();

    assert_eq!(validated.title, "Understanding Ownership");
    assert_eq!(
        validated.publication_date,
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    );
    assert_eq!(validated.metadata.number("view_count"), Some(1200.0));
}

#[test]
fn test_missing_fields_all_reported() {
    let err = validate_input(&ResourceInput::new().title("Only a title")).unwrap_err();

    assert_eq!(
        err.report.missing_fields,
        vec!["content", "author", "url", "publication_date", "metadata"]
    );
    assert!(err.to_string().contains("missing fields"));
}

#[test]
fn test_wrong_types_reported() {
    let input = valid_input()
        .title(42)
        .metadata(json!(["not", "an", "object"]));

    let err = validate_input(&input).unwrap_err();

    assert_eq!(err.report.invalid_types.len(), 2);
    assert!(err.report.invalid_types[0].starts_with("title: expected string, got number"));
    assert!(err.report.invalid_types[1].starts_with("metadata: expected object, got array"));
}

#[test]
fn test_invalid_url_and_date() {
    let input = valid_input().url("ftp://example.com").publication_date("15/01/2024");

    let err = validate_input(&input).unwrap_err();

    assert_eq!(err.report.invalid_values.len(), 2);
    assert_eq!(err.report.problem_count(), 2);
}

#[test]
fn test_metadata_problems() {
    let input = valid_input().metadata(json!({ "keywords": "rust", "language": 7 }));

    let err = validate_input(&input).unwrap_err();
    let problems = &err.report.metadata;

    assert_eq!(problems.len(), 3);
    assert!(problems.iter().any(|p| p.contains("keywords")));
    assert!(problems.iter().any(|p| p.contains("missing required metadata field: category")));
    assert!(problems.iter().any(|p| p.contains("language")));
}

#[test]
fn test_blank_text_rejected() {
    let err = validate_input(&valid_input().author("   ")).unwrap_err();
    assert_eq!(err.report.invalid_values, vec!["author: must not be empty"]);
}

#[test]
fn test_blank_metadata_rejected() {
    let input = valid_input().metadata(json!({
        "keywords": [],
        "category": "  ",
        "language": ""
    }));

    let err = validate_input(&input).unwrap_err();

    assert_eq!(
        err.report.metadata,
        vec![
            "metadata field category must not be empty",
            "metadata field language must not be empty"
        ]
    );
}

#[test]
fn test_url_pattern() {
    for url in [
        "http://example.com",
        "https://sub.example.co.uk/path?q=1",
        "http://localhost:8080/",
        "https://192.168.0.1/x",
        "HTTPS://EXAMPLE.COM",
    ] {
        assert!(is_valid_url(url), "{url} should be valid");
    }
    for url in ["example.com", "ftp://example.com", "http://", "https://exa mple.com"] {
        assert!(!is_valid_url(url), "{url} should be invalid");
    }
}

#[test]
fn test_date_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

    assert_eq!(parse_publication_date("2024-01-15T10:30:00Z"), Some(expected));
    assert_eq!(parse_publication_date("2024-01-15T12:30:00+02:00"), Some(expected));
    assert_eq!(parse_publication_date("2024-01-15T10:30:00"), Some(expected));
    assert_eq!(parse_publication_date("2024-01-15 10:30:00"), Some(expected));
    assert_eq!(
        parse_publication_date("2024-01-15"),
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_publication_date("January 15"), None);
    assert_eq!(parse_publication_date("2024-13-01"), None);
}

#[test]
fn test_clean_text_content() {
    assert_eq!(
        clean_text_content("Hello   world !How are you?"),
        "Hello world! How are you?"
    );
    assert_eq!(clean_text_content("Wait... <b>what</b>?"), "Wait. bwhatb?");
    assert_eq!(clean_text_content("   "), "");
    assert_eq!(clean_text_content("well-known fact"), "well-known fact");
}

#[test]
fn test_normalize_keywords() {
    let keywords = vec![
        " Rust ".to_string(),
        "ownership".to_string(),
        "RUST".to_string(),
        "".to_string(),
    ];
    assert_eq!(normalize_keywords(&keywords), vec!["ownership", "rust"]);
}

#[test]
fn test_prepare_raw_input() {
    let input = valid_input();
    let expected_id = input.resource_id();

    let resource = prepare(input.into()).unwrap();

    assert_eq!(resource.id(), &expected_id);
    assert_eq!(resource.url, "https://example.com/rust/ownership");
    assert_eq!(resource.metadata.keywords, vec!["ownership", "rust"]);
    assert_eq!(resource.metadata.category, "programming");
    assert_eq!(resource.metadata.language, "en");
    assert_eq!(
        resource.content,
        "Rust uses ownership! It is checked at compile time."
    );
    assert!(!resource.is_rated());
}

#[test]
fn test_prepare_entity() {
    let resource = crate::resource::Resource::new(
        ResourceId::new("entity-1"),
        "Title",
        "Author",
        "HTTPS://Example.com",
        Utc::now(),
        ResourceMetadata::new(vec!["B".into(), "a".into()], "News", "EN"),
        "Body   text",
    );

    let prepared = prepare(resource.into()).unwrap();

    assert_eq!(prepared.id().as_str(), "entity-1");
    assert_eq!(prepared.url, "https://example.com");
    assert_eq!(prepared.metadata.keywords, vec!["a", "b"]);
    assert_eq!(prepared.content, "Body text");
}

#[test]
fn test_prepare_entity_rejects_bad_url() {
    let resource = crate::resource::Resource::new(
        ResourceId::new("entity-2"),
        "Title",
        "Author",
        "not a url",
        Utc::now(),
        ResourceMetadata::default(),
        "Body",
    );

    assert!(prepare(resource.into()).is_err());
}

#[test]
fn test_prepare_entity_requires_metadata() {
    let resource = crate::resource::Resource::new(
        ResourceId::new("entity-3"),
        "Title",
        "Author",
        "https://example.com/entity",
        Utc::now(),
        ResourceMetadata::new(vec!["rust".into()], "", " "),
        "Body",
    );

    let err = prepare(resource.into()).unwrap_err();

    assert_eq!(
        err.report.metadata,
        vec![
            "metadata field category must not be empty",
            "metadata field language must not be empty"
        ]
    );
    assert!(err.report.invalid_values.is_empty());
}
