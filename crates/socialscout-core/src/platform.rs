use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::ColumnNames;
use crate::ConfigError;

/// The social platforms a run can resolve profiles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    Instagram,
    Tiktok,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::X,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Youtube,
    ];

    /// Lowercase identifier used in CLI arguments, YAML keys, and log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::X => "x",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
        }
    }

    #[must_use]
    pub fn default_url_column(self) -> &'static str {
        match self {
            Platform::X => "x_url",
            Platform::Instagram => "insta_url",
            Platform::Tiktok => "tiktok_url",
            Platform::Youtube => "youtube_url",
        }
    }

    #[must_use]
    pub fn default_count_column(self) -> &'static str {
        match self {
            Platform::X => "x_followers",
            Platform::Instagram => "insta_followers",
            Platform::Tiktok => "tiktok_followers",
            Platform::Youtube => "youtube_subscribers",
        }
    }

    #[must_use]
    pub fn default_output_path(self) -> &'static str {
        match self {
            Platform::X => "companies_x_updated.csv",
            Platform::Instagram => "companies_instagram_filled.csv",
            Platform::Tiktok => "companies_tiktok_filled.csv",
            Platform::Youtube => "companies_youtube_filled.csv",
        }
    }

    /// Minimum post (or video) count for a matched profile to be accepted
    /// when a count could be extracted at all.
    #[must_use]
    pub fn default_post_threshold(self) -> u64 {
        match self {
            Platform::X => 10,
            Platform::Instagram | Platform::Tiktok | Platform::Youtube => 5,
        }
    }

    /// Column names for this platform with the shared identity columns.
    #[must_use]
    pub fn default_columns(self) -> ColumnNames {
        ColumnNames {
            company_name: "company_name".to_string(),
            website_url: "website_url".to_string(),
            profile_url: self.default_url_column().to_string(),
            follower_count: self.default_count_column().to_string(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "twitter" => Ok(Platform::X),
            "instagram" | "insta" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "youtube" => Ok(Platform::Youtube),
            _ => Err(ConfigError::InvalidValue {
                kind: "platform",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::X);
        assert_eq!("Insta".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!(" youtube ".parse::<Platform>().unwrap(), Platform::Youtube);
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = "line".parse::<Platform>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { kind: "platform", .. }));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn x_has_stricter_post_threshold() {
        assert_eq!(Platform::X.default_post_threshold(), 10);
        assert_eq!(Platform::Tiktok.default_post_threshold(), 5);
    }

    #[test]
    fn youtube_counts_subscribers() {
        let cols = Platform::Youtube.default_columns();
        assert_eq!(cols.profile_url, "youtube_url");
        assert_eq!(cols.follower_count, "youtube_subscribers");
    }
}
