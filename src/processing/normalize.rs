use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::validate::ValidatedInput;
use crate::resource::{Resource, ResourceId, ResourceMetadata};

struct CleanPatterns {
    disallowed: Regex,
    period_runs: Regex,
    punctuation: Regex,
}

fn clean_patterns() -> &'static CleanPatterns {
    static PATTERNS: OnceLock<CleanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanPatterns {
        disallowed: Regex::new(r"[^\w\s.,!?-]").expect("valid regex"),
        period_runs: Regex::new(r"\.{2,}").expect("valid regex"),
        punctuation: Regex::new(r"\s*([.,!?])\s*").expect("valid regex"),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain-text cleanup: whitespace collapsed, characters other than word characters,
/// whitespace and `. , ! ? -` removed, period runs collapsed, one space after
/// punctuation.
pub fn clean_text_content(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let patterns = clean_patterns();
    let text = collapse_whitespace(content);
    let text = patterns.disallowed.replace_all(&text, "");
    let text = patterns.period_runs.replace_all(&text, ".");
    let text = patterns.punctuation.replace_all(&text, "$1 ");
    collapse_whitespace(&text)
}

/// Trimmed, lower-cased, non-empty, deduplicated and sorted.
pub fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn normalize_metadata(metadata: ResourceMetadata) -> ResourceMetadata {
    ResourceMetadata {
        keywords: normalize_keywords(&metadata.keywords),
        category: metadata.category.trim().to_lowercase(),
        language: metadata.language.trim().to_lowercase(),
        extra: metadata.extra,
    }
}

pub fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase()
}

/// Builds the entity from validated input with normalized fields.
pub fn normalize_input(id: ResourceId, input: ValidatedInput) -> Resource {
    Resource::new(
        id,
        input.title.trim(),
        input.author.trim(),
        normalize_url(&input.url),
        input.publication_date,
        normalize_metadata(input.metadata),
        clean_text_content(&input.content),
    )
}

/// Applies the same normalization to an already-built entity, in place.
pub fn normalize_resource(resource: &mut Resource) {
    resource.content = clean_text_content(&resource.content);
    resource.url = normalize_url(&resource.url);
    resource.metadata = normalize_metadata(std::mem::take(&mut resource.metadata));
}
