use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::error::{ValidationError, ValidationReport};
use crate::resource::{Resource, ResourceInput, ResourceMetadata};

/// `http(s)://` followed by a domain, `localhost` or an IPv4 address, optional port and path.
const URL_PATTERN: &str = r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$";

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(URL_PATTERN).expect("valid regex"))
}

pub fn is_valid_url(url: &str) -> bool {
    url_pattern().is_match(url)
}

/// Accepts RFC 3339 (`Z` or offset), ISO date-time without offset (taken as UTC),
/// or a bare ISO date (midnight UTC).
pub fn parse_publication_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required<'a>(report: &mut ValidationReport, name: &str, field: &'a Option<Value>) -> Option<&'a Value> {
    match field {
        None | Some(Value::Null) => {
            report.missing_fields.push(name.to_string());
            None
        }
        Some(value) => Some(value),
    }
}

fn required_str<'a>(report: &mut ValidationReport, name: &str, field: &'a Option<Value>) -> Option<&'a str> {
    let value = required(report, name, field)?;
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            report
                .invalid_types
                .push(format!("{}: expected string, got {}", name, type_name(value)));
            None
        }
    }
}

fn non_blank(report: &mut ValidationReport, name: &str, value: &str) {
    if value.trim().is_empty() {
        report.invalid_values.push(format!("{}: must not be empty", name));
    }
}

fn non_blank_metadata(report: &mut ValidationReport, field: &str, value: &str) {
    if value.trim().is_empty() {
        report
            .metadata
            .push(format!("metadata field {} must not be empty", field));
    }
}

fn validate_metadata(report: &mut ValidationReport, metadata: &serde_json::Map<String, Value>) {
    match metadata.get("keywords") {
        None => report
            .metadata
            .push("missing required metadata field: keywords".to_string()),
        Some(Value::Array(items)) => {
            if items.iter().any(|k| !k.is_string()) {
                report
                    .metadata
                    .push("invalid metadata type for keywords: expected array of strings".to_string());
            }
        }
        Some(other) => report.metadata.push(format!(
            "invalid metadata type for keywords: expected array, got {}",
            type_name(other)
        )),
    }

    for field in ["category", "language"] {
        match metadata.get(field) {
            None => report
                .metadata
                .push(format!("missing required metadata field: {}", field)),
            Some(Value::String(value)) => non_blank_metadata(report, field, value),
            Some(other) => report.metadata.push(format!(
                "invalid metadata type for {}: expected string, got {}",
                field,
                type_name(other)
            )),
        }
    }
}

/// Typed fields of an input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub title: String,
    pub content: String,
    pub author: String,
    pub url: String,
    pub publication_date: DateTime<Utc>,
    pub metadata: ResourceMetadata,
}

/// Checks required fields, types, URL and date syntax, and metadata, collecting every
/// problem before failing.
pub fn validate_input(input: &ResourceInput) -> Result<ValidatedInput, ValidationError> {
    let mut report = ValidationReport::default();

    let title = required_str(&mut report, "title", &input.title);
    let content = required_str(&mut report, "content", &input.content);
    let author = required_str(&mut report, "author", &input.author);
    let url = required_str(&mut report, "url", &input.url);
    let date = required_str(&mut report, "publication_date", &input.publication_date);
    let metadata = required(&mut report, "metadata", &input.metadata);

    for (name, value) in [("title", title), ("content", content), ("author", author)] {
        if let Some(value) = value {
            non_blank(&mut report, name, value);
        }
    }

    if let Some(url) = url
        && !is_valid_url(url)
    {
        report.invalid_values.push("url: invalid URL format".to_string());
    }

    let publication_date = date.and_then(|raw| {
        let parsed = parse_publication_date(raw);
        if parsed.is_none() {
            report
                .invalid_values
                .push("publication_date: invalid date format".to_string());
        }
        parsed
    });

    let metadata = metadata.and_then(|value| match value {
        Value::Object(map) => {
            validate_metadata(&mut report, map);
            Some(value)
        }
        other => {
            report
                .invalid_types
                .push(format!("metadata: expected object, got {}", type_name(other)));
            None
        }
    });

    report.clone().into_result()?;

    let metadata: ResourceMetadata = match metadata.map(|v| serde_json::from_value(v.clone())) {
        Some(Ok(metadata)) => metadata,
        Some(Err(e)) => {
            report.metadata.push(e.to_string());
            return Err(ValidationError { report });
        }
        None => return Err(ValidationError { report }),
    };

    match (title, content, author, url, publication_date) {
        (Some(title), Some(content), Some(author), Some(url), Some(publication_date)) => {
            Ok(ValidatedInput {
                title: title.to_string(),
                content: content.to_string(),
                author: author.to_string(),
                url: url.to_string(),
                publication_date,
                metadata,
            })
        }
        _ => Err(ValidationError { report }),
    }
}

/// Checks an already-built entity against the same rules as raw input: non-blank text
/// fields, a well-formed URL, and non-blank metadata category and language.
pub fn validate_resource(resource: &Resource) -> Result<(), ValidationError> {
    let mut report = ValidationReport::default();

    non_blank(&mut report, "title", &resource.title);
    non_blank(&mut report, "content", &resource.content);
    non_blank(&mut report, "author", &resource.author);
    if !is_valid_url(&resource.url) {
        report.invalid_values.push("url: invalid URL format".to_string());
    }
    non_blank_metadata(&mut report, "category", &resource.metadata.category);
    non_blank_metadata(&mut report, "language", &resource.metadata.language);

    report.into_result()
}
