//! Disk I/O for downloads.
//!
//! Bodies stream into a `.part` sibling of the output path and are renamed
//! into place only after the transfer succeeds, so a file at the final path
//! is always a completed transfer and presence stays a trustworthy resume
//! signal.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path
/// (e.g. `EFTA00000001.pdf` → `EFTA00000001.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Sequential writer for an in-progress download.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) the `.part` sibling of `final_path`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(Self {
            file,
            temp_path,
            written: 0,
        })
    }

    /// Append a body chunk.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data).context("storage write failed")?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes appended so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Sync and atomically rename the temp file to `final_path`. Consumes
    /// the writer. Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        self.file.sync_all().context("storage sync failed")?;
        drop(self.file);
        std::fs::rename(&self.temp_path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(())
    }

    /// Remove the temp file after a failed or rejected transfer.
    pub fn discard(self) -> Result<()> {
        drop(self.file);
        std::fs::remove_file(&self.temp_path)
            .with_context(|| format!("failed to remove {}", self.temp_path.display()))?;
        Ok(())
    }
}
