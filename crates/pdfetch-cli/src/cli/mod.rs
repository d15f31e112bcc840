//! CLI for the pdfetch batch document fetcher.

mod commands;

use anyhow::Result;
use clap::Parser;
use pdfetch_core::config;

use commands::{run_auth, run_fetch, run_verify};

/// Fetch a numbered range of gated documents, resuming across runs.
///
/// Without flags, runs the fetch loop: every identifier in the configured
/// range whose output file is missing gets one GET with the saved session
/// cookies attached. Re-running is always safe; the files already on disk
/// are the only progress state.
#[derive(Debug, Parser)]
#[command(name = "pdfetch")]
#[command(about = "Fetch a numbered document range from behind a verification wall", long_about = None)]
pub struct Cli {
    /// Open a visible browser to pass the verification once and save the
    /// session cookies for later runs.
    #[arg(long, conflicts_with = "verify")]
    pub auth: bool,

    /// Issue one diagnostic GET for the first identifier and report the
    /// status, headers, and body sample (no cookies, no file writes).
    #[arg(long)]
    pub verify: bool,

    /// Disable the randomized delay between requests.
    #[arg(long)]
    pub no_pause: bool,
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    cfg.validate()?;
    tracing::debug!("loaded config: {:?}", cfg);

    if cli.auth {
        run_auth(&cfg)
    } else if cli.verify {
        run_verify(&cfg)
    } else {
        run_fetch(&cfg, cli.no_pause)
    }
}

#[cfg(test)]
mod tests;
