use std::path::Path;

use socialscout_core::{AppConfig, ColumnOverrides, Platform};
use socialscout_dataset::{export_batch, write_batch};

/// Write the next `size` rows missing a `platform` URL to `out` as a JSON
/// array of `{name, website}` objects.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the batch file
/// cannot be written.
pub(crate) fn run_export_batch(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    platform: Platform,
    size: usize,
    out: &Path,
) -> anyhow::Result<()> {
    let (dataset, source) = super::load_current(config, overrides, platform)?;
    let entries = export_batch(&dataset, &overrides.columns_for(platform), size);

    if entries.is_empty() {
        println!(
            "no rows without a {platform} profile in {}; nothing exported",
            source.display()
        );
        return Ok(());
    }

    write_batch(out, &entries)?;
    println!(
        "exported {} {platform} rows from {} to {}",
        entries.len(),
        source.display(),
        out.display()
    );
    Ok(())
}
