use std::path::Path;
use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use tracing::debug;

use super::error::{ExtractionError, ExtractionResult};
use super::format::{ContentFormat, detect_format, split_data_url};

/// Turns raw document content in a known format into plain text.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, content: &str, format: ContentFormat) -> ExtractionResult<String>;
}

struct MarkupPatterns {
    script_style: Regex,
    tag: Regex,
    md_image: Regex,
    md_link: Regex,
    md_heading: Regex,
    md_quote: Regex,
    md_list: Regex,
    md_emphasis: Regex,
    md_code_fence: Regex,
}

fn markup_patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        script_style: Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
            .expect("valid regex"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("valid regex"),
        md_image: Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        md_link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        md_heading: Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]*").expect("valid regex"),
        md_quote: Regex::new(r"(?m)^[ \t]*>[ \t]?").expect("valid regex"),
        md_list: Regex::new(r"(?m)^[ \t]*(?:[-*+]|\d+\.)[ \t]+").expect("valid regex"),
        md_emphasis: Regex::new(r"\*{1,3}|_{2,3}|`+|~~").expect("valid regex"),
        md_code_fence: Regex::new(r"(?m)^```.*$").expect("valid regex"),
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Non-empty lines, each with inner whitespace collapsed.
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn html_to_text(html: &str) -> String {
    let patterns = markup_patterns();
    let text = patterns.script_style.replace_all(html, " ");
    let text = patterns.tag.replace_all(&text, " ");
    tidy_lines(&decode_entities(&text))
}

pub fn markdown_to_text(markdown: &str) -> String {
    let patterns = markup_patterns();
    let text = patterns.md_code_fence.replace_all(markdown, "");
    let text = patterns.md_image.replace_all(&text, "$1");
    let text = patterns.md_link.replace_all(&text, "$1");
    let text = patterns.md_heading.replace_all(&text, "");
    let text = patterns.md_quote.replace_all(&text, "");
    let text = patterns.md_list.replace_all(&text, "");
    let text = patterns.md_emphasis.replace_all(&text, "");
    tidy_lines(&text)
}

#[derive(Debug, Clone, Copy, Default)]
/// Extractor for the text formats (txt, md, html), with or without a base64 data-URL
/// wrapper. PDF and DOCX are rejected with [`ExtractionError::UnsupportedFormat`].
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn decode(content: &str, format: ContentFormat) -> ExtractionResult<String> {
        match split_data_url(content) {
            Some((mime, payload)) => {
                debug!(mime, payload_len = payload.len(), "Decoding base64 data URL");
                let bytes = STANDARD.decode(payload.trim())?;
                String::from_utf8(bytes).map_err(|source| ExtractionError::NotUtf8 { format, source })
            }
            None => Ok(content.to_string()),
        }
    }

    /// Reads a file and extracts it. The format comes from `hint`, then the file
    /// extension, then content detection.
    pub fn extract_file(
        &self,
        path: &Path,
        hint: Option<&str>,
    ) -> ExtractionResult<(ContentFormat, String)> {
        let hinted = hint.map(str::parse::<ContentFormat>).transpose()?;
        let declared = hinted.or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(ContentFormat::from_extension)
        });

        if let Some(format) = declared
            && format.is_binary()
        {
            return Err(ExtractionError::UnsupportedFormat(format));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ExtractionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let format = detect_format(&content, declared.map(|f| f.as_str()));
        let text = self.extract(&content, format)?;
        Ok((format, text))
    }
}

impl ContentExtractor for PlainTextExtractor {
    fn extract(&self, content: &str, format: ContentFormat) -> ExtractionResult<String> {
        if format.is_binary() {
            return Err(ExtractionError::UnsupportedFormat(format));
        }

        let text = Self::decode(content, format)?;
        let extracted = match format {
            ContentFormat::Html => html_to_text(&text),
            ContentFormat::Md => markdown_to_text(&text),
            _ => text.trim().to_string(),
        };

        debug!(%format, input_len = content.len(), output_len = extracted.len(), "Extracted text");
        Ok(extracted)
    }
}
