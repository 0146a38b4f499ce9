//! Text Extractor: turns an uploaded resume PDF into one plain-text string.
//!
//! Best-effort and never fails: a page that yields no text (or errors) contributes
//! an empty string, and an unreadable document yields an empty string overall.

use lopdf::Document;
use tracing::{debug, warn};

/// Extracts all text from a PDF held in memory.
///
/// Page contributions are concatenated in page order with no separator, and the
/// result is trimmed. Blocking; call through [`extract_text_blocking`] from async code.
pub fn extract_text(bytes: &[u8]) -> String {
    let document = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("PDF could not be parsed, continuing with empty resume text: {e}");
            return String::new();
        }
    };

    let pages = document.get_pages();
    debug!("Extracting text from {} PDF page(s)", pages.len());

    let text: String = pages
        .keys()
        .map(|&page_num| match document.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                debug!("Page {page_num} produced no text: {e}");
                String::new()
            }
        })
        .collect();

    let text = text.trim();
    if text.is_empty() && !pages.is_empty() {
        debug!("No text from page content streams; retrying with font-aware extraction");
        return extract_whole_document(bytes);
    }
    text.to_string()
}

/// Runs [`extract_text`] on the blocking pool. A panic inside the PDF libraries is
/// treated as an unreadable document.
pub async fn extract_text_blocking(bytes: bytes::Bytes) -> String {
    match tokio::task::spawn_blocking(move || extract_text(&bytes)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction task failed: {e}");
            String::new()
        }
    }
}

/// Second pass for documents that parse but give nothing page by page.
///
/// pdf-extract maps glyphs through font encodings and ToUnicode tables, and opens
/// files encrypted with an empty user password, where lopdf's own text pass
/// yields nothing. Pages stay in document order.
fn extract_whole_document(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("PDF text extraction failed, continuing with empty resume text: {e}");
            String::new()
        }
    }
}
