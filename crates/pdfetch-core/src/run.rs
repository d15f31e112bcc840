//! The resumable fetch loop.
//!
//! Iterates the configured identifier range in order, skipping identifiers
//! whose output file already exists, fetching the rest with the captured
//! session cookies, and stopping once the wall-clock budget is spent.
//! Filesystem presence is the only resume state: re-running the same
//! configuration is always safe and makes monotonic progress.

use anyhow::{Context, Result};
use rand::Rng;
use std::time::{Duration, Instant};

use crate::batch::Batch;
use crate::config::BatchConfig;
use crate::fetch::{self, RequestOptions};
use crate::session::SessionState;
use crate::stub;

/// What happened to one identifier (or its companion); forwarded to the
/// caller for progress display.
#[derive(Debug)]
pub enum FetchEvent {
    Skipped {
        ordinal: u64,
        total: u64,
        filename: String,
    },
    Downloaded {
        ordinal: u64,
        total: u64,
        filename: String,
        bytes: u64,
    },
    Failed {
        ordinal: u64,
        total: u64,
        filename: String,
        reason: String,
    },
    CompanionDownloaded {
        filename: String,
        bytes: u64,
    },
    CompanionFailed {
        filename: String,
        reason: String,
    },
    TimedOut {
        elapsed: Duration,
        remaining: u64,
    },
}

/// Counters for one run. Failures keep the identifier so the operator can
/// see what to expect on the next invocation; nothing here is persisted.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: Vec<(u64, String)>,
    pub timed_out: bool,
}

/// Per-invocation options, as opposed to the per-batch [`BatchConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Disable the randomized inter-request delay.
    pub no_pause: bool,
}

/// Runs the fetch loop to completion, timeout, or fatal error.
///
/// Fatal: missing/corrupt session state, unreadable output directory.
/// Per-identifier fetch failures are recorded in the summary and do not
/// stop the loop.
pub fn run_fetch_loop(
    cfg: &BatchConfig,
    opts: RunOptions,
    mut on_event: impl FnMut(&FetchEvent),
) -> Result<RunSummary> {
    let state = SessionState::load(&cfg.cookies_file)?;
    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir: {}", cfg.output_dir.display()))?;

    let batch = Batch::new(cfg);
    let request = RequestOptions::new(&cfg.user_agent, state.cookie_header());
    let budget = Duration::from_secs(cfg.run_timeout_secs);
    let started = Instant::now();
    let total = batch.count();
    let mut summary = RunSummary::default();
    let mut rng = rand::rng();

    tracing::info!(
        total,
        start = cfg.start_index,
        end = cfg.end_index,
        "fetch run starting"
    );

    for (i, id) in batch.ids().enumerate() {
        let ordinal = i as u64 + 1;

        if started.elapsed() >= budget {
            summary.timed_out = true;
            let remaining = total - ordinal + 1;
            tracing::info!(?budget, remaining, "run timeout reached, stopping");
            on_event(&FetchEvent::TimedOut {
                elapsed: started.elapsed(),
                remaining,
            });
            break;
        }

        let filename = batch.filename(id);
        let out_path = batch.output_path(id);

        if out_path.exists() {
            summary.skipped += 1;
            on_event(&FetchEvent::Skipped {
                ordinal,
                total,
                filename,
            });
            continue;
        }

        match fetch::fetch_document(
            &batch.url(id),
            &request,
            &out_path,
            cfg.require_pdf_magic,
            None,
        ) {
            Ok(bytes) => {
                summary.downloaded += 1;
                tracing::info!(%filename, bytes, "downloaded");
                on_event(&FetchEvent::Downloaded {
                    ordinal,
                    total,
                    filename,
                    bytes,
                });
                if cfg.fetch_stub_companions {
                    fetch_companion_if_placeholder(&batch, id, &request, &mut on_event);
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(%filename, error = %reason, "fetch failed");
                summary.failed.push((id, reason.clone()));
                on_event(&FetchEvent::Failed {
                    ordinal,
                    total,
                    filename,
                    reason,
                });
            }
        }

        if !opts.no_pause {
            pause(cfg, &mut rng);
        }
    }

    tracing::info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        timed_out = summary.timed_out,
        "fetch run finished"
    );
    Ok(summary)
}

/// After a successful document fetch: if it turned out to be a placeholder
/// PDF, try the `.mp4` companion under the same identifier. Companion
/// failures are reported but never fail the identifier.
fn fetch_companion_if_placeholder(
    batch: &Batch<'_>,
    id: u64,
    request: &RequestOptions,
    on_event: &mut impl FnMut(&FetchEvent),
) {
    if !stub::is_placeholder_pdf(&batch.output_path(id)) {
        return;
    }
    let filename = batch.filename_with_extension(id, "mp4");
    let out_path = batch.output_path_for(&filename);
    if out_path.exists() {
        return;
    }
    tracing::debug!(%filename, "placeholder detected, probing for companion");
    match fetch::fetch_document(
        &batch.url_for(&filename),
        request,
        &out_path,
        false,
        Some(stub::COMPANION_MIN_LEN),
    ) {
        Ok(bytes) => {
            tracing::info!(%filename, bytes, "companion downloaded");
            on_event(&FetchEvent::CompanionDownloaded { filename, bytes });
        }
        Err(e) => {
            let reason = e.to_string();
            tracing::debug!(%filename, error = %reason, "companion fetch failed");
            on_event(&FetchEvent::CompanionFailed { filename, reason });
        }
    }
}

/// Blocking inter-request delay, uniformly jittered between the configured
/// bounds. A zero upper bound disables the pause entirely.
fn pause(cfg: &BatchConfig, rng: &mut impl Rng) {
    let hi = cfg.delay_max_secs;
    if hi <= 0.0 {
        return;
    }
    let lo = cfg.delay_min_secs.clamp(0.0, hi);
    let secs = if hi > lo { rng.random_range(lo..hi) } else { lo };
    if secs > 0.0 {
        std::thread::sleep(Duration::from_secs_f64(secs));
    }
}
