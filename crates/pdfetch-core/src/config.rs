use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the per-batch configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "pdfetch.toml";

/// Browser-like User-Agent sent with every request. Matches what the
/// verification page saw during the `--auth` browser session closely enough
/// that the replayed cookies stay valid.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn default_true() -> bool {
    true
}

/// Per-batch configuration loaded from `pdfetch.toml`.
///
/// A batch is one (URL template, identifier range, output directory) triple.
/// The file lives next to the downloads so each batch directory is
/// self-contained: config, session file, and output all in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory URL that document filenames are appended to. May be
    /// percent-encoded; a trailing slash is optional.
    pub base_url: String,
    /// Filename prefix before the zero-padded identifier (e.g. "EFTA").
    pub file_prefix: String,
    /// Filename extension without the dot (e.g. "pdf").
    pub file_extension: String,
    /// Zero-pad width for the identifier (8 → `EFTA00000001.pdf`).
    pub pad_width: usize,
    /// First document identifier, inclusive.
    pub start_index: u64,
    /// Last document identifier, inclusive.
    pub end_index: u64,
    /// Directory output files are written to; created if missing.
    pub output_dir: PathBuf,
    /// Session state file written by `--auth` and read by the fetch loop.
    /// Holds bearer-like credentials; keep it out of version control.
    pub cookies_file: PathBuf,
    /// User-Agent header sent on every request.
    pub user_agent: String,
    /// Lower bound of the randomized inter-request delay, in seconds.
    pub delay_min_secs: f64,
    /// Upper bound of the randomized inter-request delay, in seconds.
    pub delay_max_secs: f64,
    /// Wall-clock budget for one fetch run; the loop stops once exceeded
    /// and a later invocation picks up where it left off.
    pub run_timeout_secs: u64,
    /// Reject 2xx bodies that do not start with `%PDF` (challenge pages
    /// come back as HTML with status 200).
    #[serde(default = "default_true")]
    pub require_pdf_magic: bool,
    /// After a placeholder PDF, probe for an `.mp4` companion under the
    /// same identifier.
    #[serde(default = "default_true")]
    pub fetch_stub_companions: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.org/files/DataSet%201".to_string(),
            file_prefix: "DOC".to_string(),
            file_extension: "pdf".to_string(),
            pad_width: 8,
            start_index: 1,
            end_index: 1,
            output_dir: PathBuf::from("downloads"),
            cookies_file: PathBuf::from("cookies.json"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_min_secs: 1.0,
            delay_max_secs: 3.0,
            run_timeout_secs: 300,
            require_pdf_magic: true,
            fetch_stub_companions: true,
        }
    }
}

impl BatchConfig {
    /// Sanity-checks the values an operator is most likely to get wrong.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: {}", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("base_url must be http(s), got {}", url.scheme());
        }
        if self.start_index > self.end_index {
            anyhow::bail!(
                "start_index {} is past end_index {}",
                self.start_index,
                self.end_index
            );
        }
        if self.file_extension.is_empty() {
            anyhow::bail!("file_extension must not be empty");
        }
        if self.delay_min_secs > self.delay_max_secs {
            anyhow::bail!(
                "delay_min_secs {} exceeds delay_max_secs {}",
                self.delay_min_secs,
                self.delay_max_secs
            );
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Load the batch configuration from the working directory, creating a
/// default file if none exists so the operator has something to edit.
pub fn load_or_init() -> Result<BatchConfig> {
    load_or_init_at(&config_path())
}

pub fn load_or_init_at(path: &Path) -> Result<BatchConfig> {
    if !path.exists() {
        let default_cfg = BatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
