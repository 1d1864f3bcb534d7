use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempDir;

use super::format::{DATA_URL_DOCX, DATA_URL_HTML, DATA_URL_MARKDOWN, DATA_URL_PDF, DATA_URL_TEXT};
use super::*;

#[test]
fn test_format_parse() {
    for format in ContentFormat::ALL {
        assert_eq!(format.as_str().parse::<ContentFormat>().unwrap(), format);
    }
    assert_eq!("PDF".parse::<ContentFormat>().unwrap(), ContentFormat::Pdf);
    assert!(matches!(
        "rtf".parse::<ContentFormat>(),
        Err(ExtractionError::UnknownFormat(_))
    ));
}

#[test]
fn test_detect_format_hint_wins() {
    assert_eq!(detect_format("# heading", Some("txt")), ContentFormat::Txt);
    assert_eq!(detect_format("plain", Some("HTML")), ContentFormat::Html);
    // Unsupported hints fall through to content detection.
    assert_eq!(detect_format("# heading", Some("rtf")), ContentFormat::Md);
}

#[test]
fn test_detect_format_from_content() {
    assert_eq!(detect_format(&format!("{DATA_URL_PDF}AAAA"), None), ContentFormat::Pdf);
    assert_eq!(detect_format(&format!("{DATA_URL_HTML}AAAA"), None), ContentFormat::Html);
    assert_eq!(detect_format(&format!("{DATA_URL_DOCX}AAAA"), None), ContentFormat::Docx);
    assert_eq!(detect_format(&format!("{DATA_URL_MARKDOWN}AAAA"), None), ContentFormat::Md);
    assert_eq!(
        detect_format("  <!DOCTYPE html><html></html>", None),
        ContentFormat::Html
    );
    assert_eq!(detect_format("# Title\nbody", None), ContentFormat::Md);
    assert_eq!(detect_format("just words", None), ContentFormat::Txt);
    assert_eq!(detect_format("", None), ContentFormat::Txt);
}

#[test]
fn test_split_data_url() {
    assert_eq!(
        split_data_url("data:text/plain;base64,SGk="),
        Some(("text/plain", "SGk="))
    );
    assert_eq!(split_data_url("SGk="), None);
}

#[test]
fn test_extract_plain_and_base64_text() {
    let extractor = PlainTextExtractor::new();

    assert_eq!(
        extractor.extract("  hello world \n", ContentFormat::Txt).unwrap(),
        "hello world"
    );

    let encoded = format!("{DATA_URL_TEXT}{}", STANDARD.encode("decoded text"));
    assert_eq!(
        extractor.extract(&encoded, ContentFormat::Txt).unwrap(),
        "decoded text"
    );
}

#[test]
fn test_extract_invalid_base64() {
    let err = PlainTextExtractor::new()
        .extract(&format!("{DATA_URL_TEXT}!!!not base64"), ContentFormat::Txt)
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Base64(_)));
}

#[test]
fn test_extract_markdown() {
    let md = "# Guide\n\nSome **bold** and *italic* text with a [link](https://x.io).\n\n- item one\n- item two\n> quoted";
    let text = PlainTextExtractor::new()
        .extract(md, ContentFormat::Md)
        .unwrap();

    assert_eq!(
        text,
        "Guide\nSome bold and italic text with a link.\nitem one\nitem two\nquoted"
    );
}

#[test]
fn test_extract_html() {
    let html = "<!DOCTYPE html><html><head><style>p { color: red; }</style>\
                <script>alert('x')</script></head><body><h1>Title</h1>\
                <p>Fish &amp; chips</p></body></html>";
    let encoded = format!("{DATA_URL_HTML}{}", STANDARD.encode(html));

    let text = PlainTextExtractor::new()
        .extract(&encoded, ContentFormat::Html)
        .unwrap();

    assert_eq!(text, "Title Fish & chips");
}

#[test]
fn test_binary_formats_unsupported() {
    let extractor = PlainTextExtractor::new();
    for format in [ContentFormat::Pdf, ContentFormat::Docx] {
        assert!(matches!(
            extractor.extract("data", format),
            Err(ExtractionError::UnsupportedFormat(f)) if f == format
        ));
    }
}

#[test]
fn test_extract_file() {
    let temp = TempDir::new().expect("temp dir");
    let md_path = temp.path().join("notes.md");
    std::fs::write(&md_path, "## Notes\nUse `cargo`.").unwrap();

    let (format, text) = PlainTextExtractor::new()
        .extract_file(&md_path, None)
        .unwrap();
    assert_eq!(format, ContentFormat::Md);
    assert_eq!(text, "Notes\nUse cargo.");

    let pdf_path = temp.path().join("paper.pdf");
    std::fs::write(&pdf_path, [0x25, 0x50, 0x44, 0x46]).unwrap();
    assert!(matches!(
        PlainTextExtractor::new().extract_file(&pdf_path, None),
        Err(ExtractionError::UnsupportedFormat(ContentFormat::Pdf))
    ));

    let missing = temp.path().join("missing.txt");
    assert!(matches!(
        PlainTextExtractor::new().extract_file(&missing, None),
        Err(ExtractionError::Io { .. })
    ));

    assert!(matches!(
        PlainTextExtractor::new().extract_file(&md_path, Some("rtf")),
        Err(ExtractionError::UnknownFormat(_))
    ));
}
