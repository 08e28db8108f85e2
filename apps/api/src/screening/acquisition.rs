//! Text acquisition: turns an uploaded resume file into plain text.
//!
//! Only `.pdf` and `.txt` uploads are accepted. PDF pages that yield no text
//! (scanned images, blank pages) are skipped rather than reported.

use std::panic;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Pdf,
    Text,
}

impl ResumeFormat {
    /// Picks the format from the filename extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Some(ResumeFormat::Pdf)
        } else if lower.ends_with(".txt") {
            Some(ResumeFormat::Text)
        } else {
            None
        }
    }
}

/// Decodes an upload into text. Blocking for PDFs; call from a blocking task.
pub fn acquire_text(
    filename: &str,
    bytes: &[u8],
) -> Result<(ResumeFormat, String), AcquisitionError> {
    let format = ResumeFormat::from_filename(filename)
        .ok_or_else(|| AcquisitionError::UnsupportedFormat(filename.to_string()))?;

    let text = match format {
        ResumeFormat::Pdf => pdf_to_text(bytes)?,
        ResumeFormat::Text => decode_text(bytes),
    };
    Ok((format, text))
}

/// Lossy UTF-8 decode; invalid sequences become U+FFFD and a leading BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

fn pdf_to_text(bytes: &[u8]) -> Result<String, AcquisitionError> {
    // pdf-extract panics on some malformed documents.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| AcquisitionError::Pdf("extractor aborted on malformed document".to_string()))?
        .map_err(|e| AcquisitionError::Pdf(e.to_string()))?;
    Ok(join_pages(pages))
}

/// Concatenates page texts with a newline separator, skipping blank pages.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_PAGE_PDF: &[u8] =
        include_bytes!("../../tests/fixtures/three_pages_blank_middle.pdf");

    #[test]
    fn test_format_from_filename() {
        assert_eq!(ResumeFormat::from_filename("cv.PDF"), Some(ResumeFormat::Pdf));
        assert_eq!(ResumeFormat::from_filename("notes.txt"), Some(ResumeFormat::Text));
        assert_eq!(ResumeFormat::from_filename("resume.docx"), None);
        assert_eq!(ResumeFormat::from_filename("pdf"), None);
        assert_eq!(ResumeFormat::from_filename(""), None);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = acquire_text("resume.docx", b"irrelevant").unwrap_err();
        assert_eq!(
            err,
            AcquisitionError::UnsupportedFormat("resume.docx".to_string())
        );
    }

    #[test]
    fn test_text_upload_decodes_lossily() {
        let (format, text) = acquire_text("cv.txt", b"Jane \xFF Doe").unwrap();
        assert_eq!(format, ResumeFormat::Text);
        assert_eq!(text, "Jane \u{FFFD} Doe");
    }

    #[test]
    fn test_text_upload_drops_bom() {
        let (_, text) = acquire_text("cv.txt", "\u{feff}Jane Doe".as_bytes()).unwrap();
        assert_eq!(text, "Jane Doe");
    }

    #[test]
    fn test_garbage_pdf_is_an_error_not_a_panic() {
        let err = acquire_text("cv.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AcquisitionError::Pdf(_)));
    }

    #[test]
    fn test_pdf_upload_joins_pages_and_skips_blank_ones() {
        let pages = pdf_extract::extract_text_from_mem_by_pages(THREE_PAGE_PDF).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("FirstPage"));
        assert!(pages[1].trim().is_empty());
        assert!(pages[2].contains("ThirdPage"));

        let (format, text) = acquire_text("resume.PDF", THREE_PAGE_PDF).unwrap();
        assert_eq!(format, ResumeFormat::Pdf);
        assert_eq!(text, format!("{}\n{}", pages[0], pages[2]));
    }

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let pages = vec![
            "Jane Doe".to_string(),
            "   \n".to_string(),
            String::new(),
            "Skills: Rust".to_string(),
        ];
        assert_eq!(join_pages(pages), "Jane Doe\nSkills: Rust");
    }
}
