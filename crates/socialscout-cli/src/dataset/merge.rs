use std::path::Path;

use anyhow::Context;
use socialscout_core::{AppConfig, ColumnOverrides, Platform, TextEncoding};
use socialscout_dataset::{merge_platform, Dataset};

/// Fold every platform's output file back into the input dataset and write
/// the result to `out` as UTF-8 with a byte-order mark.
///
/// Platforms without an output file are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the input or a platform file cannot be loaded, or
/// the merged file cannot be written.
pub(crate) fn run_merge(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    out: &Path,
) -> anyhow::Result<()> {
    if out == config.input_path {
        anyhow::bail!(
            "merge output {} must differ from the input dataset",
            out.display()
        );
    }

    let mut base = Dataset::load(&config.input_path, &config.read_encodings)
        .with_context(|| format!("failed to load dataset {}", config.input_path.display()))?;

    let mut merged_platforms = 0usize;
    for platform in Platform::ALL {
        let path = overrides.output_path_for(platform);
        if !path.exists() {
            tracing::warn!(%platform, path = %path.display(), "no output file; skipping");
            continue;
        }

        let platform_ds = Dataset::load(&path, &config.read_encodings)
            .with_context(|| format!("failed to load {platform} output {}", path.display()))?;
        let cols = overrides.columns_for(platform);
        if platform_ds.column_index(&cols.company_name).is_none() {
            tracing::warn!(
                %platform,
                path = %path.display(),
                column = %cols.company_name,
                "output file has no company name column; skipping"
            );
            continue;
        }

        let stats = merge_platform(&mut base, &platform_ds, &cols);
        tracing::info!(
            %platform,
            matched = stats.matched,
            updated = stats.updated,
            unmatched = stats.unmatched,
            "platform merged"
        );
        println!(
            "{platform}: {} rows matched, {} cells updated, {} names not in input",
            stats.matched, stats.updated, stats.unmatched
        );
        merged_platforms += 1;
    }

    base.save(out, TextEncoding::Utf8Bom)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "merged {merged_platforms} platform files into {}",
        out.display()
    );
    Ok(())
}
