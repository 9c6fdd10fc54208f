//! Content retrieval: turning a URL into page HTML.
//!
//! Retrieval never fails from the caller's point of view. Every outcome is a
//! [`FetchResult`] whose `failure` says what went wrong; a timed-out load
//! still carries whatever content arrived before the deadline.

mod http;
mod rendered;

use std::future::Future;

use socialscout_core::AppConfig;
use thiserror::Error;

use crate::error::ScraperError;

pub use http::HttpFetcher;
pub use rendered::RenderedFetcher;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("load timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("render error: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    /// Page HTML; possibly partial when `failure` is [`FetchFailure::Timeout`],
    /// empty for every other failure.
    pub html: String,
    pub failure: Option<FetchFailure>,
}

impl FetchResult {
    #[must_use]
    pub fn loaded(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            failure: None,
        }
    }

    #[must_use]
    pub fn failed(url: impl Into<String>, failure: FetchFailure) -> Self {
        Self {
            url: url.into(),
            html: String::new(),
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn partial(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            failure: Some(FetchFailure::Timeout),
        }
    }

    /// `true` when the content is worth parsing: a complete load, or a
    /// timed-out one that still delivered some content.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        match &self.failure {
            None => true,
            Some(FetchFailure::Timeout) => !self.html.trim().is_empty(),
            Some(_) => false,
        }
    }
}

/// Loads a page and returns its HTML.
pub trait PageFetcher {
    fn load(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// The configured content-retrieval backend.
pub enum ContentFetcher {
    Http(HttpFetcher),
    Rendered(RenderedFetcher),
}

impl ContentFetcher {
    /// Builds the rendered backend when `SOCIALSCOUT_BROWSERLESS_URL` is set,
    /// otherwise plain HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        match &config.browserless_url {
            Some(base_url) => Ok(Self::Rendered(RenderedFetcher::new(
                base_url,
                config.browserless_token.as_deref(),
                config.request_timeout_secs,
            )?)),
            None => Ok(Self::Http(HttpFetcher::new(
                config.request_timeout_secs,
                &config.user_agent,
            )?)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Rendered(_) => "browserless",
        }
    }

    /// Verifies the backend is reachable before any row is processed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CollaboratorUnavailable`] when the rendering
    /// service cannot be reached. Plain HTTP has nothing to probe.
    pub async fn probe(&self) -> Result<(), ScraperError> {
        match self {
            Self::Http(_) => Ok(()),
            Self::Rendered(fetcher) => fetcher.probe().await,
        }
    }
}

impl PageFetcher for ContentFetcher {
    fn load(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        let url = url.to_string();
        async move {
            match self {
                Self::Http(fetcher) => fetcher.load(&url).await,
                Self::Rendered(fetcher) => fetcher.load(&url).await,
            }
        }
    }
}

/// Decodes `bytes` using the charset named in a `Content-Type` header value,
/// falling back to UTF-8.
pub(crate) fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(|ct| {
            ct.split(';')
                .map(str::trim)
                .find_map(|part| part.strip_prefix("charset="))
        })
        .and_then(|label| encoding_rs::Encoding::for_label(label.trim_matches('"').as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_with_content_is_usable() {
        assert!(FetchResult::partial("https://x.com/a", "<html>partial").is_usable());
        assert!(!FetchResult::partial("https://x.com/a", "  ").is_usable());
    }

    #[test]
    fn hard_failures_are_not_usable() {
        assert!(!FetchResult::failed("u", FetchFailure::Status(404)).is_usable());
        assert!(!FetchResult::failed("u", FetchFailure::Network("reset".into())).is_usable());
        assert!(FetchResult::loaded("u", "").is_usable());
    }

    #[test]
    fn decode_body_honours_charset() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("公式サイト");
        assert_eq!(
            decode_body(&bytes, Some("text/html; charset=Shift_JIS")),
            "公式サイト"
        );
        assert_eq!(decode_body("ok".as_bytes(), None), "ok");
    }
}
