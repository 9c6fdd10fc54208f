use std::path::PathBuf;
use std::str::FromStr;

use crate::ConfigError;

/// Text encodings understood by the dataset reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 that must start with a byte-order mark; the mark is stripped on
    /// read and written on save.
    Utf8Bom,
    Utf8,
    /// Windows-31J, the Shift-JIS superset most Japanese spreadsheets emit.
    Cp932,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Utf8Bom => write!(f, "utf-8-sig"),
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Cp932 => write!(f, "cp932"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8-sig" | "utf8-sig" | "utf-8-bom" => Ok(TextEncoding::Utf8Bom),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp932" | "windows-31j" | "shift-jis" | "sjis" => Ok(TextEncoding::Cp932),
            _ => Err(ConfigError::InvalidValue {
                kind: "encoding",
                value: s.to_string(),
            }),
        }
    }
}

/// Which rows a run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Only rows without a recorded profile URL are searched.
    #[default]
    Fill,
    /// Rows with a recorded URL are re-validated; a reject falls back to search.
    Reverify,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Fill => write!(f, "fill"),
            RunMode::Reverify => write!(f, "reverify"),
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(RunMode::Fill),
            "reverify" | "verify" => Ok(RunMode::Reverify),
            _ => Err(ConfigError::InvalidValue {
                kind: "run mode",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub log_level: String,
    pub checkpoint_interval: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_base_url: String,
    pub search_delay_ms: u64,
    pub search_max_results: usize,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    pub read_encodings: Vec<TextEncoding>,
    pub write_encoding: TextEncoding,
    pub scan_official_site: bool,
    pub columns_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("input_path", &self.input_path)
            .field("log_level", &self.log_level)
            .field("checkpoint_interval", &self.checkpoint_interval)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_base_url", &self.search_base_url)
            .field("search_delay_ms", &self.search_delay_ms)
            .field("search_max_results", &self.search_max_results)
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_ref().map(|_| "[redacted]"),
            )
            .field("read_encodings", &self.read_encodings)
            .field("write_encoding", &self.write_encoding)
            .field("scan_official_site", &self.scan_official_site)
            .field("columns_path", &self.columns_path)
            .finish()
    }
}
