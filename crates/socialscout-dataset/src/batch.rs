//! Fixed-size JSON batches of rows still missing a platform URL, for
//! external enrichment tooling.

use std::path::Path;

use serde::Serialize;
use socialscout_core::ColumnNames;

use crate::dataset::Dataset;
use crate::error::DatasetError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub website: String,
}

/// The first `size` named rows whose profile URL is empty, in row order.
#[must_use]
pub fn export_batch(dataset: &Dataset, cols: &ColumnNames, size: usize) -> Vec<BatchEntry> {
    (0..dataset.len())
        .filter_map(|row| dataset.record(row, cols))
        .filter(|record| record.has_name() && !record.has_profile())
        .take(size)
        .map(|record| BatchEntry {
            name: record.company_name,
            website: record.website_url.unwrap_or_default(),
        })
        .collect()
}

/// Writes `entries` to `path` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`DatasetError`] if serialization or the write fails.
pub fn write_batch(path: &Path, entries: &[BatchEntry]) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json).map_err(|e| DatasetError::io(path, e))?;
    tracing::info!(path = %path.display(), entries = entries.len(), "batch written");
    Ok(())
}
