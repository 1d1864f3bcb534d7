use serde::{Deserialize, Serialize};

use super::error::ExtractionError;

pub const DATA_URL_PDF: &str = "data:application/pdf;base64,";
pub const DATA_URL_HTML: &str = "data:text/html;base64,";
pub const DATA_URL_DOCX: &str =
    "data:application/vnd.openxmlformats-officedocument.wordprocessingml.document;base64,";
pub const DATA_URL_MARKDOWN: &str = "data:text/markdown;base64,";
pub const DATA_URL_TEXT: &str = "data:text/plain;base64,";

const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Pdf,
    Html,
    Docx,
    Txt,
    Md,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 5] = [
        ContentFormat::Pdf,
        ContentFormat::Html,
        ContentFormat::Docx,
        ContentFormat::Txt,
        ContentFormat::Md,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Pdf => "pdf",
            ContentFormat::Html => "html",
            ContentFormat::Docx => "docx",
            ContentFormat::Txt => "txt",
            ContentFormat::Md => "md",
        }
    }

    /// PDF and DOCX are binary containers.
    pub fn is_binary(&self) -> bool {
        matches!(self, ContentFormat::Pdf | ContentFormat::Docx)
    }

    /// Format implied by a file extension, if any.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "html" | "htm" => Some(Self::Html),
            "docx" => Some(Self::Docx),
            "txt" | "text" => Some(Self::Txt),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "md" => Ok(Self::Md),
            _ => Err(ExtractionError::UnknownFormat(s.to_string())),
        }
    }
}

/// Picks the content format: a supported `hint` wins, then data-URL prefixes, an HTML
/// doctype, a leading `#` for markdown, and plain text otherwise.
pub fn detect_format(content: &str, hint: Option<&str>) -> ContentFormat {
    if let Some(format) = hint.and_then(|h| h.parse::<ContentFormat>().ok()) {
        return format;
    }

    if content.starts_with(DATA_URL_PDF) {
        ContentFormat::Pdf
    } else if content.starts_with(DATA_URL_HTML)
        || starts_with_ignore_case(content.trim_start(), "<!doctype html>")
    {
        ContentFormat::Html
    } else if content.starts_with(DATA_URL_DOCX) {
        ContentFormat::Docx
    } else if content.starts_with(DATA_URL_MARKDOWN) || content.starts_with('#') {
        ContentFormat::Md
    } else {
        ContentFormat::Txt
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Splits a `data:<mime>;base64,<payload>` string into mime prefix and payload.
pub fn split_data_url(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("data:")?;
    rest.split_once(BASE64_MARKER)
}
