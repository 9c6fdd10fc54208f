//! The resumable per-platform row processor and its wiring.
//!
//! [`engine::RowProcessor`] walks dataset rows in order, resolving each one
//! through verification of a recorded URL or a fresh candidate search, and
//! persists the dataset through a [`CheckpointSink`] every
//! `checkpoint_interval` processed rows and once more when the run ends for
//! any reason.

mod command;
mod engine;

use std::path::{Path, PathBuf};

use socialscout_core::{ColumnNames, Platform, RunMode, TextEncoding};
use socialscout_dataset::{Dataset, DatasetError};

pub(crate) use command::{run_platform, RunArgs};
pub(crate) use engine::RowProcessor;

/// Immutable parameters for one platform run, fixed before the engine starts.
#[derive(Debug, Clone)]
pub(crate) struct RunConfig {
    pub platform: Platform,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub checkpoint_interval: usize,
    pub post_count_threshold: u64,
    pub columns: ColumnNames,
    pub start_offset: usize,
    pub mode: RunMode,
    pub scan_official_site: bool,
}

/// How a single row ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    /// No company name; untouched and not counted.
    Skipped,
    /// Fill mode row that already has a URL; untouched and not counted.
    AlreadyResolved,
    /// The recorded URL passed re-validation.
    Verified,
    /// A search candidate was accepted.
    Found,
    /// Nothing was accepted; profile cells are empty.
    Unresolved,
}

impl RowOutcome {
    /// Whether the row went through the verify or search path.
    pub(crate) fn is_processed(self) -> bool {
        matches!(self, Self::Verified | Self::Found | Self::Unresolved)
    }
}

/// End-of-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub processed: usize,
    pub verified: usize,
    pub found: usize,
    pub unresolved: usize,
    pub skipped: usize,
    pub already_resolved: usize,
    pub checkpoints: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::AlreadyResolved => self.already_resolved += 1,
            RowOutcome::Verified => self.verified += 1,
            RowOutcome::Found => self.found += 1,
            RowOutcome::Unresolved => self.unresolved += 1,
        }
        if outcome.is_processed() {
            self.processed += 1;
        }
    }

    pub(crate) fn accepted(&self) -> usize {
        self.verified + self.found
    }
}

/// Durable storage for the in-memory dataset.
pub(crate) trait CheckpointSink {
    /// Persists the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] when the dataset could not be written.
    fn persist(&mut self, dataset: &Dataset) -> Result<(), DatasetError>;
}

/// Writes checkpoints to the platform output file.
pub(crate) struct FileSink {
    path: PathBuf,
    encoding: TextEncoding,
}

impl FileSink {
    pub(crate) fn new(path: &Path, encoding: TextEncoding) -> Self {
        Self {
            path: path.to_path_buf(),
            encoding,
        }
    }
}

impl CheckpointSink for FileSink {
    fn persist(&mut self, dataset: &Dataset) -> Result<(), DatasetError> {
        dataset.save(&self.path, self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_only_processed_rows() {
        let mut summary = RunSummary::default();
        for outcome in [
            RowOutcome::Skipped,
            RowOutcome::AlreadyResolved,
            RowOutcome::Verified,
            RowOutcome::Found,
            RowOutcome::Unresolved,
        ] {
            summary.record(outcome);
        }
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.accepted(), 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.already_resolved, 1);
    }

    #[test]
    fn file_sink_writes_with_configured_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let dataset = Dataset::from_csv_str("company_name\nテスト\n").unwrap();

        FileSink::new(&path, TextEncoding::Cp932)
            .persist(&dataset)
            .unwrap();

        let reloaded = Dataset::load(&path, &[TextEncoding::Utf8, TextEncoding::Cp932]).unwrap();
        assert_eq!(reloaded.encoding(), TextEncoding::Cp932);
        assert_eq!(reloaded.get(0, "company_name"), Some("テスト"));
    }
}
