//! Content extraction: format tags, format detection and a text-format extractor.
//!
//! The rating pipeline only ever consumes plain text. Binary documents (PDF, DOCX)
//! are recognized but need an external parser behind [`ContentExtractor`].

pub mod error;
pub mod extractor;
pub mod format;

#[cfg(test)]
mod tests;

pub use error::{ExtractionError, ExtractionResult};
pub use extractor::{ContentExtractor, PlainTextExtractor, html_to_text, markdown_to_text};
pub use format::{ContentFormat, detect_format, split_data_url};
