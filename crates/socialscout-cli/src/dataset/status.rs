use socialscout_core::{AppConfig, ColumnOverrides, Platform};
use socialscout_dataset::status;

/// Print progress for `platform` and the next `next` rows a run would
/// process.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub(crate) fn run_status(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    platform: Platform,
    next: usize,
) -> anyhow::Result<()> {
    let (dataset, source) = super::load_current(config, overrides, platform)?;
    let report = status(&dataset, &overrides.columns_for(platform), next);

    println!("{platform} ({})", source.display());
    println!("  total:     {}", report.total);
    println!("  done:      {}", report.done);
    println!("  remaining: {}", report.remaining);

    if report.next.is_empty() {
        return Ok(());
    }
    println!("next rows:");
    println!("{:<6}{:<32}WEBSITE", "ROW", "COMPANY");
    for (row, record) in &report.next {
        println!(
            "{:<6}{:<32}{}",
            row,
            record.company_name,
            record.website_url.as_deref().unwrap_or("\u{2014}")
        );
    }
    Ok(())
}
