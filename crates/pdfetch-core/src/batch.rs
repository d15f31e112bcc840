//! Deterministic identifier → filename / URL mapping for one batch.
//!
//! Every identifier in the configured closed range maps to exactly one
//! filename and one request URL, so the filesystem presence check alone
//! decides what still needs fetching.

use crate::config::BatchConfig;
use std::path::PathBuf;

/// View over a [`BatchConfig`] that derives filenames, URLs, and output
/// paths per document identifier.
pub struct Batch<'a> {
    cfg: &'a BatchConfig,
}

impl<'a> Batch<'a> {
    pub fn new(cfg: &'a BatchConfig) -> Self {
        Self { cfg }
    }

    /// Number of identifiers in the closed range.
    pub fn count(&self) -> u64 {
        self.cfg.end_index - self.cfg.start_index + 1
    }

    /// Identifiers in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = u64> {
        self.cfg.start_index..=self.cfg.end_index
    }

    /// `{prefix}{id:0pad}.{extension}`, e.g. `EFTA00000001.pdf`.
    /// Identifiers wider than `pad_width` keep all their digits.
    pub fn filename(&self, id: u64) -> String {
        self.filename_with_extension(id, &self.cfg.file_extension)
    }

    /// Same identifier, different extension (companion files).
    pub fn filename_with_extension(&self, id: u64, extension: &str) -> String {
        format!(
            "{}{:0width$}.{}",
            self.cfg.file_prefix,
            id,
            extension,
            width = self.cfg.pad_width
        )
    }

    /// Request URL for a filename: base joined by exactly one slash,
    /// regardless of whether `base_url` carries a trailing slash.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), filename)
    }

    /// Request URL for an identifier's document.
    pub fn url(&self, id: u64) -> String {
        self.url_for(&self.filename(id))
    }

    /// URL of the first identifier; the bootstrap and verify modes target this.
    pub fn first_url(&self) -> String {
        self.url(self.cfg.start_index)
    }

    /// Output path for a filename inside the configured output directory.
    pub fn output_path_for(&self, filename: &str) -> PathBuf {
        self.cfg.output_dir.join(filename)
    }

    /// Canonical output path for an identifier's document.
    pub fn output_path(&self, id: u64) -> PathBuf {
        self.output_path_for(&self.filename(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BatchConfig {
        BatchConfig {
            base_url: "https://archive.example.net/files/DataSet%209".to_string(),
            file_prefix: "EFTA".to_string(),
            file_extension: "pdf".to_string(),
            pad_width: 8,
            start_index: 39025,
            end_index: 39027,
            output_dir: "downloads_9th_batch".into(),
            ..BatchConfig::default()
        }
    }

    #[test]
    fn filename_zero_pads_identifier() {
        let cfg = cfg();
        let batch = Batch::new(&cfg);
        assert_eq!(batch.filename(1), "EFTA00000001.pdf");
        assert_eq!(batch.filename(39025), "EFTA00039025.pdf");
    }

    #[test]
    fn filename_keeps_digits_wider_than_pad() {
        let mut cfg = cfg();
        cfg.pad_width = 3;
        let batch = Batch::new(&cfg);
        assert_eq!(batch.filename(1264712), "EFTA1264712.pdf");
    }

    #[test]
    fn companion_filename_swaps_extension() {
        let cfg = cfg();
        let batch = Batch::new(&cfg);
        assert_eq!(
            batch.filename_with_extension(39025, "mp4"),
            "EFTA00039025.mp4"
        );
    }

    #[test]
    fn url_joins_with_single_slash() {
        let mut cfg = cfg();
        let url = Batch::new(&cfg).url(39025);
        assert_eq!(
            url,
            "https://archive.example.net/files/DataSet%209/EFTA00039025.pdf"
        );

        cfg.base_url.push('/');
        let url = Batch::new(&cfg).url(39025);
        assert_eq!(
            url,
            "https://archive.example.net/files/DataSet%209/EFTA00039025.pdf"
        );
    }

    #[test]
    fn first_url_uses_start_index() {
        let cfg = cfg();
        let batch = Batch::new(&cfg);
        assert!(batch.first_url().ends_with("EFTA00039025.pdf"));
    }

    #[test]
    fn count_is_inclusive() {
        let cfg = cfg();
        assert_eq!(Batch::new(&cfg).count(), 3);

        let single = BatchConfig {
            start_index: 7,
            end_index: 7,
            ..cfg
        };
        assert_eq!(Batch::new(&single).count(), 1);
    }

    #[test]
    fn ids_increase_over_full_range() {
        let cfg = cfg();
        let ids: Vec<u64> = Batch::new(&cfg).ids().collect();
        assert_eq!(ids, vec![39025, 39026, 39027]);
    }

    #[test]
    fn output_path_joins_output_dir() {
        let cfg = cfg();
        let batch = Batch::new(&cfg);
        assert_eq!(
            batch.output_path(39025),
            PathBuf::from("downloads_9th_batch/EFTA00039025.pdf")
        );
    }
}
