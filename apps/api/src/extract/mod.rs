//! Document extraction — turns PDF/DOCX attachment bytes into plain text.
//!
//! Failures are explicit: callers get `Err(ExtractError)` and decide how to
//! degrade. The pipeline treats a failed extraction as an empty contribution
//! and keeps the message eligible for body-text fallback. Failure text is
//! never surfaced as if it were résumé content.
//!
//! No OCR, no layout preservation, no embedded-image handling.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

/// Attachment formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Pdf,
    Docx,
}

impl DocKind {
    /// Detects the document kind from an attachment filename.
    /// Returns None for anything that is not a PDF or DOCX.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocKind::Docx)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Extracts plain text from an attachment payload.
pub fn extract(payload: &[u8], kind: DocKind) -> Result<String, ExtractError> {
    match kind {
        DocKind::Pdf => extract_pdf(payload),
        DocKind::Docx => extract_docx(payload),
    }
}

/// Per-page text in page order, as produced by pdf-extract. A page that
/// yields no text contributes nothing.
fn extract_pdf(payload: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed files; contain it here so a bad
    // attachment can never take down a scan.
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(payload)
    }));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser panicked on malformed input".to_string())),
    }
}

/// Paragraph texts in document order, one paragraph per line.
fn extract_docx(payload: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(payload).map_err(|e| ExtractError::Docx(format!("{e:?}")))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}
