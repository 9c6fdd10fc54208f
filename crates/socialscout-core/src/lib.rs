//! Shared types and configuration for socialscout.
//!
//! Everything here is free of I/O except configuration loading, so the
//! scraper, dataset, and CLI crates can agree on platform identity, column
//! naming, and record shape without depending on each other.

pub mod app_config;
pub mod columns;
pub mod config;
pub mod platform;
pub mod record;

use thiserror::Error;

pub use app_config::{AppConfig, RunMode, TextEncoding};
pub use columns::{load_column_overrides, ColumnOverrides, PlatformColumns};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::Platform;
pub use record::{ColumnNames, CompanyRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid value \"{value}\" for {kind}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("failed to read columns file {path}: {source}")]
    ColumnsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse columns file: {0}")]
    ColumnsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
