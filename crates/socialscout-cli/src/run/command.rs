use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use socialscout_core::{AppConfig, ColumnOverrides, Platform, RunMode};
use socialscout_dataset::Dataset;
use socialscout_scraper::{BingSearch, ContentFetcher};

use super::{FileSink, RowProcessor, RunConfig, RunSummary};

/// Arguments of the `run` command.
#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// Platform to resolve profiles on (x, instagram, tiktok, youtube)
    #[arg(long)]
    pub platform: Platform,

    /// Zero-based data row to start from
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// `fill` searches rows without a URL; `reverify` also re-checks recorded URLs
    #[arg(long, default_value = "fill")]
    pub mode: RunMode,

    /// Start from the input file even if a platform output file exists
    #[arg(long)]
    pub fresh: bool,

    /// Input dataset (defaults to `SOCIALSCOUT_INPUT_PATH`)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output dataset (defaults to the platform's output file)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Builds the run configuration from the app config and CLI arguments.
pub(crate) fn build_run_config(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    args: &RunArgs,
) -> RunConfig {
    RunConfig {
        platform: args.platform,
        input_path: args
            .input
            .clone()
            .unwrap_or_else(|| config.input_path.clone()),
        output_path: args
            .output
            .clone()
            .unwrap_or_else(|| overrides.output_path_for(args.platform)),
        checkpoint_interval: config.checkpoint_interval,
        post_count_threshold: args.platform.default_post_threshold(),
        columns: overrides.columns_for(args.platform),
        start_offset: args.start,
        mode: args.mode,
        scan_official_site: config.scan_official_site,
    }
}

/// Resolves one platform's profiles for every eligible row.
///
/// Resumes from the platform output file when it exists unless `--fresh`
/// is given. The content-retrieval backend is probed before any row is
/// touched.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or saved, the
/// collaborators cannot be built, or the rendering backend is unreachable.
pub(crate) async fn run_platform(
    config: &AppConfig,
    overrides: &ColumnOverrides,
    args: &RunArgs,
    stop: &AtomicBool,
) -> anyhow::Result<RunSummary> {
    let run_config = build_run_config(config, overrides, args);
    if run_config.input_path == run_config.output_path {
        anyhow::bail!(
            "output path {} must differ from the input so the source is never overwritten",
            run_config.output_path.display()
        );
    }

    let source_path = if !args.fresh && run_config.output_path.exists() {
        tracing::info!(path = %run_config.output_path.display(), "resuming from previous output");
        &run_config.output_path
    } else {
        &run_config.input_path
    };

    let mut dataset = Dataset::load(source_path, &config.read_encodings)
        .with_context(|| format!("failed to load dataset {}", source_path.display()))?;
    dataset
        .prepare_columns(&run_config.columns, &source_path.display().to_string())
        .context("dataset is missing required columns")?;

    let fetcher = ContentFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build content fetcher: {e}"))?;
    fetcher
        .probe()
        .await
        .context("content retrieval backend is unavailable")?;
    let search = BingSearch::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?;

    tracing::info!(
        platform = %run_config.platform,
        fetcher = fetcher.name(),
        output = %run_config.output_path.display(),
        "collaborators ready"
    );

    let started_at = Utc::now();
    let processor = RowProcessor::new(&run_config, &search, &fetcher);
    let mut sink = FileSink::new(&run_config.output_path, config.write_encoding);
    let summary = processor
        .run(&mut dataset, &mut sink, stop)
        .await
        .with_context(|| format!("failed to save {}", run_config.output_path.display()))?;

    print_summary(&run_config, &summary, (Utc::now() - started_at).num_seconds());
    Ok(summary)
}

fn print_summary(config: &RunConfig, summary: &RunSummary, elapsed_secs: i64) {
    let status = if summary.interrupted {
        "interrupted"
    } else {
        "complete"
    };
    println!(
        "{} run {status} in {elapsed_secs}s: {} processed, {} accepted ({} verified, {} found), {} unresolved, {} skipped, {} already resolved",
        config.platform,
        summary.processed,
        summary.accepted(),
        summary.verified,
        summary.found,
        summary.unresolved,
        summary.skipped,
        summary.already_resolved,
    );
    println!("saved to {}", config.output_path.display());
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: RunArgs,
    }

    fn args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["run"];
        full.extend_from_slice(argv);
        Wrapper::try_parse_from(full).expect("valid args").args
    }

    fn app_config() -> AppConfig {
        AppConfig {
            input_path: "companies.csv".into(),
            log_level: "info".to_string(),
            checkpoint_interval: 10,
            request_timeout_secs: 20,
            user_agent: "test".to_string(),
            search_base_url: "http://127.0.0.1:1".to_string(),
            search_delay_ms: 0,
            search_max_results: 10,
            browserless_url: None,
            browserless_token: None,
            read_encodings: vec![socialscout_core::TextEncoding::Utf8],
            write_encoding: socialscout_core::TextEncoding::Utf8Bom,
            scan_official_site: true,
            columns_path: None,
        }
    }

    #[test]
    fn run_config_uses_platform_defaults() {
        let cfg = build_run_config(
            &app_config(),
            &ColumnOverrides::default(),
            &args(&["--platform", "instagram", "--start", "7"]),
        );
        assert_eq!(cfg.output_path, PathBuf::from("companies_instagram_filled.csv"));
        assert_eq!(cfg.columns.profile_url, "insta_url");
        assert_eq!(cfg.post_count_threshold, 5);
        assert_eq!(cfg.start_offset, 7);
        assert_eq!(cfg.checkpoint_interval, 10);
        assert_eq!(cfg.mode, RunMode::Fill);
    }

    #[test]
    fn run_config_prefers_cli_paths() {
        let cfg = build_run_config(
            &app_config(),
            &ColumnOverrides::default(),
            &args(&["--platform", "x", "--input", "a.csv", "--output", "b.csv"]),
        );
        assert_eq!(cfg.input_path, PathBuf::from("a.csv"));
        assert_eq!(cfg.output_path, PathBuf::from("b.csv"));
        assert_eq!(cfg.post_count_threshold, 10);
    }

    #[tokio::test]
    async fn refuses_to_overwrite_the_input() {
        let stop = AtomicBool::new(false);
        let err = run_platform(
            &app_config(),
            &ColumnOverrides::default(),
            &args(&["--platform", "x", "--output", "companies.csv"]),
            &stop,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("must differ from the input"));
    }

    #[tokio::test]
    async fn missing_company_name_column_aborts_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "name,website_url\nAcme,\n").unwrap();
        let output = dir.path().join("out.csv");
        let stop = AtomicBool::new(false);

        let err = run_platform(
            &app_config(),
            &ColumnOverrides::default(),
            &args(&[
                "--platform",
                "tiktok",
                "--input",
                input.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ]),
            &stop,
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("company_name"));
        assert!(!output.exists());
    }
}
