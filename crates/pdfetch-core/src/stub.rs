//! Placeholder ("No Images Produced") PDFs and their video companions.
//!
//! Some identifiers carry no scanned images; the server returns a small
//! generated PDF saying so, and often hosts the footage for the same
//! identifier under an `.mp4` extension instead. Classification is cheap:
//! a size window first, text extraction only for files inside it.

use std::path::Path;

/// Generated placeholders are ~3 KB; anything outside this window is a
/// real document.
const STUB_SIZE_MIN: u64 = 2 * 1024;
const STUB_SIZE_MAX: u64 = 4 * 1024;

/// Page text of a placeholder.
const STUB_PHRASE: &str = "No Images Produced";

/// Companion bodies smaller than this are assumed to be error pages and
/// are not persisted.
pub const COMPANION_MIN_LEN: u64 = 1024;

/// True if the file at `path` is a placeholder PDF: size inside the stub
/// window and extracted page text containing the marker phrase. Any
/// extraction failure classifies as not-a-placeholder.
pub fn is_placeholder_pdf(path: &Path) -> bool {
    let size = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m.len(),
        _ => return false,
    };
    if !(STUB_SIZE_MIN..=STUB_SIZE_MAX).contains(&size) {
        return false;
    }
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return false,
    };
    match pdf_extract::extract_text_from_mem(&bytes) {
        Ok(text) => text.contains(STUB_PHRASE),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "placeholder text extraction failed");
            false
        }
    }
}
