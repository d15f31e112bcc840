//! Default mode – the resumable fetch loop.

use anyhow::Result;
use pdfetch_core::config::BatchConfig;
use pdfetch_core::run::{self, FetchEvent, RunOptions};

pub fn run_fetch(cfg: &BatchConfig, no_pause: bool) -> Result<()> {
    let summary = run::run_fetch_loop(cfg, RunOptions { no_pause }, |event| match event {
        FetchEvent::Skipped {
            ordinal,
            total,
            filename,
        } => println!("[{ordinal}/{total}] Skip (exists): {filename}"),
        FetchEvent::Downloaded {
            ordinal,
            total,
            filename,
            bytes,
        } => println!("[{ordinal}/{total}] Downloaded: {filename} ({bytes} bytes)"),
        FetchEvent::Failed {
            ordinal,
            total,
            filename,
            reason,
        } => println!("[{ordinal}/{total}] Failed {filename}: {reason}"),
        FetchEvent::CompanionDownloaded { filename, bytes } => {
            println!("  -> also saved companion: {filename} ({bytes} bytes)")
        }
        FetchEvent::CompanionFailed { filename, reason } => {
            println!("  -> companion {filename}: {reason}")
        }
        FetchEvent::TimedOut { elapsed, remaining } => println!(
            "Run timeout reached after {}s; {remaining} identifier(s) left for the next run.",
            elapsed.as_secs()
        ),
    })?;

    if !summary.failed.is_empty() {
        println!("Failed ({}):", summary.failed.len());
        for (id, reason) in &summary.failed {
            println!("  {id}: {reason}");
        }
    }
    println!(
        "Done. {} downloaded, {} skipped, {} failed.",
        summary.downloaded,
        summary.skipped,
        summary.failed.len()
    );
    Ok(())
}
