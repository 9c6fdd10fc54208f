use crate::app_config::{AppConfig, TextEncoding};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
            },
        }
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let input_path = PathBuf::from(or_default("SOCIALSCOUT_INPUT_PATH", "companies.csv"));
    let log_level = or_default("SOCIALSCOUT_LOG_LEVEL", "info");

    let checkpoint_interval = parse_usize("SOCIALSCOUT_CHECKPOINT_INTERVAL", "10")?;
    if checkpoint_interval == 0 {
        return Err(invalid(
            "SOCIALSCOUT_CHECKPOINT_INTERVAL",
            "must be at least 1".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("SOCIALSCOUT_REQUEST_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("SOCIALSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let search_base_url = or_default("SOCIALSCOUT_SEARCH_BASE_URL", "https://www.bing.com")
        .trim_end_matches('/')
        .to_string();
    let search_delay_ms = parse_u64("SOCIALSCOUT_SEARCH_DELAY_MS", "2000")?;
    let search_max_results = parse_usize("SOCIALSCOUT_SEARCH_MAX_RESULTS", "10")?;

    let browserless_url = non_empty("SOCIALSCOUT_BROWSERLESS_URL");
    let browserless_token = non_empty("SOCIALSCOUT_BROWSERLESS_TOKEN");

    let read_encodings = parse_encoding_chain(&or_default(
        "SOCIALSCOUT_READ_ENCODINGS",
        "utf-8-sig,utf-8,cp932",
    ))
    .map_err(|reason| invalid("SOCIALSCOUT_READ_ENCODINGS", reason))?;
    let write_encoding = or_default("SOCIALSCOUT_WRITE_ENCODING", "utf-8-sig")
        .parse::<TextEncoding>()
        .map_err(|e| invalid("SOCIALSCOUT_WRITE_ENCODING", e.to_string()))?;

    let scan_official_site = parse_bool("SOCIALSCOUT_SCAN_OFFICIAL_SITE", true)?;
    let columns_path = non_empty("SOCIALSCOUT_COLUMNS_PATH").map(PathBuf::from);

    Ok(AppConfig {
        input_path,
        log_level,
        checkpoint_interval,
        request_timeout_secs,
        user_agent,
        search_base_url,
        search_delay_ms,
        search_max_results,
        browserless_url,
        browserless_token,
        read_encodings,
        write_encoding,
        scan_official_site,
        columns_path,
    })
}

/// Parse a comma-separated, ordered encoding fallback chain.
fn parse_encoding_chain(raw: &str) -> Result<Vec<TextEncoding>, String> {
    let mut chain = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let encoding = part.parse::<TextEncoding>().map_err(|e| e.to_string())?;
        if !chain.contains(&encoding) {
            chain.push(encoding);
        }
    }
    if chain.is_empty() {
        return Err("at least one encoding is required".to_string());
    }
    Ok(chain)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
