//! Diagnostic GET for the `--verify` mode.
//!
//! Fetches the first identifier's URL with no cookies and no file writes,
//! and reports what came back: status, headers, and a body sample. Used to
//! tell whether the endpoint serves documents directly or is challenge-gated.

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::fetch::PDF_MAGIC;

/// How much of the body to keep for the report.
pub const BODY_SAMPLE_LEN: usize = 500;

/// What a single diagnostic GET observed.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub status: u32,
    /// Raw response header lines, in wire order (including the status line
    /// of each response in a redirect chain).
    pub headers: Vec<String>,
    /// First [`BODY_SAMPLE_LEN`] bytes of the body.
    pub body_sample: Vec<u8>,
    /// Total body length received.
    pub body_len: u64,
}

impl ProbeReport {
    /// True if the body sample starts with the PDF magic.
    pub fn looks_like_pdf(&self) -> bool {
        self.body_sample.starts_with(PDF_MAGIC)
    }
}

/// Performs one GET and returns the observation. Never writes files.
/// Non-2xx statuses are part of the report, not an error; only transport
/// failures (DNS, connect, timeout) return Err.
pub fn probe(url: &str, user_agent: &str) -> Result<ProbeReport> {
    let mut headers: Vec<String> = Vec::new();
    let mut body_sample: Vec<u8> = Vec::with_capacity(BODY_SAMPLE_LEN);
    let mut body_len: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(user_agent)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let s = s.trim_end();
                if !s.is_empty() {
                    headers.push(s.to_string());
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            body_len += data.len() as u64;
            let room = BODY_SAMPLE_LEN.saturating_sub(body_sample.len());
            body_sample.extend_from_slice(&data[..room.min(data.len())]);
            Ok(data.len())
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let status = easy.response_code().context("no response code")?;

    Ok(ProbeReport {
        status,
        headers,
        body_sample,
        body_len,
    })
}
