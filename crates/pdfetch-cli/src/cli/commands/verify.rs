//! `pdfetch --verify` – single diagnostic GET, no auth, no downloads.

use anyhow::Result;
use pdfetch_core::batch::Batch;
use pdfetch_core::config::BatchConfig;
use pdfetch_core::probe;

pub fn run_verify(cfg: &BatchConfig) -> Result<()> {
    let url = Batch::new(cfg).first_url();
    eprintln!("GET {url}");

    let report = probe::probe(&url, &cfg.user_agent)?;

    println!("Status: {}", report.status);
    println!("Headers:");
    for line in &report.headers {
        println!("  {line}");
    }
    println!(
        "First {} of {} body bytes:",
        report.body_sample.len(),
        report.body_len
    );
    println!("{:?}", String::from_utf8_lossy(&report.body_sample));
    println!("Starts with %PDF: {}", report.looks_like_pdf());
    Ok(())
}
