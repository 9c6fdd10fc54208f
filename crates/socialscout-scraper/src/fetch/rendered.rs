use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::{FetchFailure, FetchResult, PageFetcher};
use crate::error::ScraperError;

/// Extra client-side slack on top of the page timeout handed to the
/// rendering service, so the service reports its own timeout first.
const CLIENT_TIMEOUT_SLACK_SECS: u64 = 10;

/// Retrieval through a Browserless-compatible `/content` endpoint, which
/// returns the DOM after JavaScript has run.
pub struct RenderedFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl RenderedFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ScraperError::Http`] if the client cannot be constructed.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs + CLIENT_TIMEOUT_SLACK_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: token.map(String::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn endpoint(&self, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.post(format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.query(&[("token", token)]),
            None => builder,
        }
    }

    /// Checks that the rendering service answers at all. Any HTTP response
    /// counts as reachable; only transport failures are fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CollaboratorUnavailable`] when the service
    /// cannot be connected to.
    pub async fn probe(&self) -> Result<(), ScraperError> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => {
                tracing::debug!(
                    endpoint = %self.base_url,
                    status = response.status().as_u16(),
                    "rendering service reachable"
                );
                Ok(())
            }
            Err(e) => Err(ScraperError::CollaboratorUnavailable {
                collaborator: "browserless",
                endpoint: self.base_url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    async fn fetch(&self, url: &str) -> FetchResult {
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = self.timeout.as_millis() as u64;
        let body = serde_json::json!({
            "url": url,
            "bestAttempt": true,
            "gotoOptions": { "waitUntil": "networkidle2", "timeout": timeout_ms },
        });

        let response = match self.endpoint("/content").json(&body).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return FetchResult::failed(url, FetchFailure::Timeout),
            Err(e) => return FetchResult::failed(url, FetchFailure::Network(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = message.trim();
            return FetchResult::failed(
                url,
                FetchFailure::Render(format!("status {}: {message}", status.as_u16())),
            );
        }

        match response.text().await {
            Ok(html) => FetchResult::loaded(url, html),
            Err(e) if e.is_timeout() => FetchResult::failed(url, FetchFailure::Timeout),
            Err(e) => FetchResult::failed(url, FetchFailure::Network(e.to_string())),
        }
    }
}

impl PageFetcher for RenderedFetcher {
    fn load(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        async move {
            let result = self.fetch(url).await;
            match &result.failure {
                Some(failure) => tracing::warn!(url, error = %failure, "rendered load failed"),
                None => tracing::debug!(url, bytes = result.html.len(), "rendered page loaded"),
            }
            result
        }
    }
}
