//! One-time interactive verification.
//!
//! Opens a visible browser at the first document URL, blocks until the
//! operator confirms in the terminal that the robot/age challenge has been
//! cleared, then harvests the browsing context's cookies and overwrites
//! the session file. The browser is the only place the challenge can be
//! passed; everything after replays the captured cookies over plain HTTP.

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions};
use std::io::{self, BufRead, Write};

use crate::batch::Batch;
use crate::config::BatchConfig;
use crate::session::{SessionCookie, SessionState};

/// Runs the bootstrapper. Launch or navigation failures are fatal; there
/// is no retry. Returns the number of cookies captured.
pub fn run(cfg: &BatchConfig) -> Result<usize> {
    let url = Batch::new(cfg).first_url();

    let launch_options = LaunchOptions::default_builder()
        .headless(false)
        .window_size(Some((1280, 900)))
        .build()
        .map_err(|e| anyhow::anyhow!("assemble browser launch options: {e}"))?;
    let browser =
        Browser::new(launch_options).context("launch browser (is Chrome/Chromium installed?)")?;
    let tab = browser.new_tab().context("open browser tab")?;

    eprintln!("Opening browser to: {url}");
    eprintln!("Complete the robot/age verification in the browser window.");
    tab.navigate_to(&url)
        .with_context(|| format!("navigate to {url}"))?;
    tab.wait_until_navigated().context("load entry page")?;

    wait_for_operator()?;

    let cookies = tab.get_cookies().context("read cookies from browser")?;
    let state = SessionState {
        cookies: cookies
            .into_iter()
            .map(|c| SessionCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
            })
            .collect(),
    };
    state.save(&cfg.cookies_file)?;
    tracing::info!(
        count = state.cookies.len(),
        path = %cfg.cookies_file.display(),
        "session state saved"
    );
    Ok(state.cookies.len())
}

/// Blocking prompt on the controlling terminal; returns once the operator
/// presses Enter. Unbounded by design, cancellable only by interrupt.
fn wait_for_operator() -> Result<()> {
    eprint!("Press Enter here after you have verified in the browser... ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read operator confirmation")?;
    Ok(())
}
