//! Dataset command handlers: batch export, merge, and status.
//!
//! These read the platform output file when one exists, so they reflect the
//! latest checkpoint of an in-progress run, and fall back to the input
//! dataset otherwise.

mod batch;
mod merge;
mod status;

use std::path::PathBuf;

use anyhow::Context;
use socialscout_core::{AppConfig, ColumnOverrides, Platform};
use socialscout_dataset::Dataset;

pub(crate) use batch::run_export_batch;
pub(crate) use merge::run_merge;
pub(crate) use status::run_status;

/// Loads the most current dataset for `platform` and makes sure its profile
/// columns exist.
fn load_current(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    platform: Platform,
) -> anyhow::Result<(Dataset, PathBuf)> {
    let output = overrides.output_path_for(platform);
    let path = if output.exists() {
        output
    } else {
        config.input_path.clone()
    };

    let mut dataset = Dataset::load(&path, &config.read_encodings)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;
    dataset
        .prepare_columns(&overrides.columns_for(platform), &path.display().to_string())
        .context("dataset is missing required columns")?;
    Ok((dataset, path))
}
