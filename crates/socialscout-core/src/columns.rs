//! Optional YAML overrides for dataset column names and output paths.
//!
//! ```yaml
//! company_name_column: company_name
//! website_column: website_url
//! platforms:
//!   instagram:
//!     url_column: instagram_url
//!     count_column: instagram_followers
//!     output_path: out/instagram.csv
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::platform::Platform;
use crate::record::ColumnNames;
use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformColumns {
    pub url_column: Option<String>,
    pub count_column: Option<String>,
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnOverrides {
    pub company_name_column: Option<String>,
    pub website_column: Option<String>,
    #[serde(default)]
    pub platforms: HashMap<Platform, PlatformColumns>,
}

impl ColumnOverrides {
    /// Effective column names for `platform`, falling back to the defaults.
    #[must_use]
    pub fn columns_for(&self, platform: Platform) -> ColumnNames {
        let mut cols = platform.default_columns();
        if let Some(name) = &self.company_name_column {
            cols.company_name.clone_from(name);
        }
        if let Some(name) = &self.website_column {
            cols.website_url.clone_from(name);
        }
        if let Some(overrides) = self.platforms.get(&platform) {
            if let Some(name) = &overrides.url_column {
                cols.profile_url.clone_from(name);
            }
            if let Some(name) = &overrides.count_column {
                cols.follower_count.clone_from(name);
            }
        }
        cols
    }

    #[must_use]
    pub fn output_path_for(&self, platform: Platform) -> PathBuf {
        self.platforms
            .get(&platform)
            .and_then(|p| p.output_path.clone())
            .unwrap_or_else(|| PathBuf::from(platform.default_output_path()))
    }
}

/// Load and validate column overrides from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_column_overrides(path: &Path) -> Result<ColumnOverrides, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ColumnsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let overrides: ColumnOverrides = serde_yaml::from_str(&content)?;
    validate_overrides(&overrides)?;
    Ok(overrides)
}

fn validate_overrides(overrides: &ColumnOverrides) -> Result<(), ConfigError> {
    for platform in Platform::ALL {
        let cols = overrides.columns_for(platform);
        let names = [
            &cols.company_name,
            &cols.website_url,
            &cols.profile_url,
            &cols.follower_count,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "column names for {platform} must be non-empty"
            )));
        }
        let unique: HashSet<&str> = names.iter().map(|n| n.as_str()).collect();
        if unique.len() != names.len() {
            return Err(ConfigError::Validation(format!(
                "column names for {platform} must be distinct: {names:?}"
            )));
        }
    }

    let mut seen_outputs = HashSet::new();
    for platform in Platform::ALL {
        let output = overrides.output_path_for(platform);
        if !seen_outputs.insert(output.clone()) {
            return Err(ConfigError::Validation(format!(
                "output path {} is shared by more than one platform",
                output.display()
            )));
        }
    }

    Ok(())
}
