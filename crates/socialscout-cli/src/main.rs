mod dataset;
mod run;

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use socialscout_core::{load_column_overrides, AppConfig, ColumnOverrides, Platform};
use tracing_subscriber::EnvFilter;

use crate::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "socialscout")]
#[command(about = "Find and verify company profiles on X, Instagram, TikTok, and YouTube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve profile URLs and follower counts for one platform
    Run(RunArgs),
    /// Export rows still missing a platform URL as a JSON batch
    ExportBatch {
        /// Platform whose URL column is checked
        #[arg(long)]
        platform: Platform,
        /// Maximum number of rows in the batch
        #[arg(long, default_value = "5")]
        size: usize,
        /// Destination JSON file
        #[arg(long, default_value = "batch.json")]
        out: PathBuf,
    },
    /// Merge every platform output file back into the input dataset
    Merge {
        /// Destination CSV file
        #[arg(long, default_value = "companies_final.csv")]
        out: PathBuf,
    },
    /// Show progress for one platform
    Status {
        /// Platform to report on
        #[arg(long)]
        platform: Platform,
        /// Number of pending rows to list
        #[arg(long, default_value = "5")]
        next: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = socialscout_core::load_app_config().context("invalid configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let overrides = load_overrides(&config)?;

    match cli.command {
        Commands::Run(args) => {
            let stop = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&stop);
            tokio::spawn(async move {
                watch_interrupts(interrupt_signal, &flag).await;
                tracing::error!("second interrupt received; exiting without a final save");
                std::process::exit(130);
            });
            run::run_platform(&config, &overrides, &args, &stop).await?;
        }
        Commands::ExportBatch {
            platform,
            size,
            out,
        } => dataset::run_export_batch(&config, &overrides, platform, size, &out)?,
        Commands::Merge { out } => dataset::run_merge(&config, &overrides, &out)?,
        Commands::Status { platform, next } => {
            dataset::run_status(&config, &overrides, platform, next)?;
        }
    }

    Ok(())
}

fn load_overrides(config: &AppConfig) -> anyhow::Result<ColumnOverrides> {
    match &config.columns_path {
        Some(path) => load_column_overrides(path)
            .with_context(|| format!("failed to load column overrides {}", path.display())),
        None => Ok(ColumnOverrides::default()),
    }
}

/// Sets `stop` on the first interrupt so the run finishes its row and
/// saves, then resolves on the second one. Checkpoints are written through a
/// temp file and rename, so exiting afterwards leaves the last one intact.
async fn watch_interrupts<F, Fut>(mut next_interrupt: F, stop: &AtomicBool)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    next_interrupt().await;
    tracing::warn!(
        "interrupt received; finishing the current row and saving (interrupt again to quit)"
    );
    stop.store(true, Ordering::SeqCst);
    next_interrupt().await;
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM. A handler that cannot be
/// installed never resolves.
async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests;
