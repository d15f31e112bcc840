//! Single-document HTTP GET with session cookies attached.
//!
//! One blocking curl transfer per document, streamed into a `.part` file
//! and renamed into place on success. Challenge pages (2xx HTML instead of
//! a document) are detected from the first body bytes and never persisted.

use crate::storage::PartFile;
use std::path::Path;
use std::time::Duration;

/// Magic bytes a real PDF body starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Why one document failed. Per-item failures never abort the run; the
/// loop records them and moves on, and the next invocation retries via the
/// presence check.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// curl-level failure: connect, DNS, timeout, aborted transfer.
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// Response completed with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// 2xx response whose body is not the expected document type
    /// (typically an HTML challenge page), or one below the size floor.
    #[error("body is not a document (Content-Type: {content_type})")]
    NotDocument { content_type: String },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Connection parameters shared by every request in a run.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub user_agent: String,
    /// Pre-folded `Cookie` header value, if session state was loaded.
    pub cookie_header: Option<String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl RequestOptions {
    pub fn new(user_agent: &str, cookie_header: Option<String>) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            cookie_header,
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
        }
    }
}

fn new_easy(url: &str, opts: &RequestOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    if let Some(cookie) = &opts.cookie_header {
        easy.cookie(cookie)?;
    }
    Ok(easy)
}

/// Downloads `url` into `final_path` via a `.part` sibling.
///
/// With `require_magic`, a 2xx body not starting with `%PDF` aborts the
/// transfer and fails as [`FetchError::NotDocument`]. `min_len` rejects
/// bodies below a size floor (used for companion fetches so error pages
/// are not persisted). On any failure the `.part` file is removed and
/// `final_path` is left untouched. Returns the number of bytes written.
pub fn fetch_document(
    url: &str,
    opts: &RequestOptions,
    final_path: &Path,
    require_magic: bool,
    min_len: Option<u64>,
) -> Result<u64, FetchError> {
    let mut part = PartFile::create(final_path)?;
    let mut easy = new_easy(url, opts)?;

    let mut prefix: Vec<u8> = Vec::with_capacity(PDF_MAGIC.len());
    let mut magic_decided = !require_magic;
    let mut rejected = false;
    let mut storage_failed: Option<anyhow::Error> = None;

    let transfer_result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if !magic_decided {
                let need = PDF_MAGIC.len() - prefix.len();
                prefix.extend_from_slice(&data[..need.min(data.len())]);
                if prefix.len() >= PDF_MAGIC.len() {
                    magic_decided = true;
                    if !prefix.starts_with(PDF_MAGIC) {
                        rejected = true;
                        return Ok(0); // abort the transfer
                    }
                }
            }
            match part.append(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    storage_failed = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    let code = easy.response_code().unwrap_or(0);
    let content_type = easy
        .content_type()
        .ok()
        .flatten()
        .unwrap_or("(none)")
        .to_string();

    // An aborted transfer surfaces as a curl write error; only treat the
    // perform result as transport failure when we did not abort ourselves.
    if !rejected && storage_failed.is_none() {
        if let Err(e) = transfer_result {
            let _ = part.discard();
            return Err(FetchError::Transport(e));
        }
    }
    if !(200..300).contains(&code) {
        let _ = part.discard();
        return Err(FetchError::Http(code));
    }
    if rejected {
        let _ = part.discard();
        return Err(FetchError::NotDocument { content_type });
    }
    if let Some(e) = storage_failed {
        let _ = part.discard();
        return Err(FetchError::Storage(e));
    }
    // Body shorter than the magic itself cannot be a document either.
    if require_magic && !prefix.starts_with(PDF_MAGIC) {
        let _ = part.discard();
        return Err(FetchError::NotDocument { content_type });
    }
    if let Some(min) = min_len {
        if part.bytes_written() < min {
            let _ = part.discard();
            return Err(FetchError::NotDocument { content_type });
        }
    }

    let written = part.bytes_written();
    part.finalize(final_path)?;
    Ok(written)
}
