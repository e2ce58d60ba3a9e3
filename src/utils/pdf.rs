//! PDF text extraction utilities.
//!
//! `pdf-extract` decodes the whole document first. When it errors, panics or
//! finds no text, each page is decoded with `lopdf` in ascending page order
//! and the page texts are concatenated as-is.

use lopdf::Document;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract text from in-memory PDF bytes.
///
/// # Examples
///
/// ```ignore
/// let text = extract_text(&bytes)?;
/// println!("Extracted {} characters", text.len());
/// ```
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfExtractError> {
    if bytes.is_empty() {
        return Err(PdfExtractError::InvalidFile("empty document".to_string()));
    }

    extract_with_fallback(bytes, extract_document, extract_pages)
}

/// Extract text from a PDF file on disk.
pub fn extract_text_from_path(path: &Path) -> Result<String, PdfExtractError> {
    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}

/// Run `primary`, then `fallback` when `primary` fails or yields only whitespace
fn extract_with_fallback<P, F>(
    bytes: &[u8],
    primary: P,
    fallback: F,
) -> Result<String, PdfExtractError>
where
    P: FnOnce(&[u8]) -> Result<String, PdfExtractError>,
    F: FnOnce(&[u8]) -> Result<String, PdfExtractError>,
{
    match primary(bytes) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(text) => {
            tracing::debug!("pdf-extract found no text, decoding pages with lopdf");
            match fallback(bytes) {
                Ok(pages) if !pages.trim().is_empty() => Ok(pages),
                _ => Ok(text),
            }
        }
        Err(primary_err) => {
            tracing::debug!("{}, decoding pages with lopdf", primary_err);
            fallback(bytes).map_err(|e| {
                PdfExtractError::ExtractionFailed(format!("{}; {}", primary_err, e))
            })
        }
    }
}

fn extract_document(bytes: &[u8]) -> Result<String, PdfExtractError> {
    // pdf-extract panics on some font and encoding tables it does not support
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| PdfExtractError::ExtractionFailed(e.to_string())),
        Err(_) => Err(PdfExtractError::ExtractionFailed(
            "pdf-extract panicked".to_string(),
        )),
    }
}

fn extract_pages(bytes: &[u8]) -> Result<String, PdfExtractError> {
    let document = Document::load_mem(bytes)
        .map_err(|e| PdfExtractError::ExtractionFailed(e.to_string()))?;

    // BTreeMap keyed by page number, so iteration is in page order
    let pages = document.get_pages();
    let mut text = String::new();

    for page_number in pages.keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            PdfExtractError::ExtractionFailed(format!("page {}: {}", page_number, e))
        })?;
        text.push_str(&page_text);
    }

    if text.trim().is_empty() {
        // Scanned or image-only PDFs decode fine but carry no text layer
        tracing::debug!("Extracted empty text from {} page(s)", pages.len());
    }

    Ok(text)
}
