use thiserror::Error;

use super::format::ContentFormat;

#[derive(Debug, Error)]
/// Text extraction failures. The rating pipeline never sees raw documents; these only
/// surface to whoever feeds it.
pub enum ExtractionError {
    /// Format tag outside pdf, html, docx, txt, md.
    #[error("unknown content format: {0}")]
    UnknownFormat(String),

    /// Known format this extractor cannot read (binary documents need an external parser).
    #[error("{0} extraction is not supported by this extractor")]
    UnsupportedFormat(ContentFormat),

    /// Malformed base64 payload in a data URL.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("{format} content is not valid UTF-8")]
    NotUtf8 {
        format: ContentFormat,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
