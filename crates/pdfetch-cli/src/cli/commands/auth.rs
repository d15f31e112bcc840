//! `pdfetch --auth` – one-time interactive verification.

use anyhow::Result;
use pdfetch_core::bootstrap;
use pdfetch_core::config::BatchConfig;

pub fn run_auth(cfg: &BatchConfig) -> Result<()> {
    let count = bootstrap::run(cfg)?;
    println!(
        "Saved {count} cookie(s) to {}",
        cfg.cookies_file.display()
    );
    println!("Run pdfetch without flags to start downloading.");
    Ok(())
}
