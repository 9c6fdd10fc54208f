use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use tokio::time::{timeout_at, Instant};

use super::{decode_body, FetchFailure, FetchResult, PageFetcher};
use crate::error::ScraperError;

/// Upper bound on bytes read from a single page.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Plain `GET` retrieval with a browser-like `User-Agent`.
///
/// The whole load (connect, headers, body) shares one deadline. When the
/// deadline passes mid-body, the bytes received so far are returned as a
/// partial result instead of being discarded.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    async fn fetch(&self, url: &str) -> FetchResult {
        let deadline = Instant::now() + self.timeout;

        let request = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .header(ACCEPT_LANGUAGE, "ja,en;q=0.8")
            .send();
        let mut response = match timeout_at(deadline, request).await {
            Err(_) => return FetchResult::failed(url, FetchFailure::Timeout),
            Ok(Err(e)) => return FetchResult::failed(url, FetchFailure::Network(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failed(url, FetchFailure::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body: Vec<u8> = Vec::new();
        loop {
            match timeout_at(deadline, response.chunk()).await {
                Err(_) => {
                    let html = decode_body(&body, content_type.as_deref());
                    return FetchResult::partial(url, html);
                }
                Ok(Err(e)) => {
                    return FetchResult::failed(url, FetchFailure::Network(e.to_string()));
                }
                Ok(Ok(None)) => break,
                Ok(Ok(Some(chunk))) => {
                    body.extend_from_slice(&chunk);
                    if body.len() >= MAX_BODY_BYTES {
                        tracing::debug!(url, bytes = body.len(), "body truncated at size limit");
                        break;
                    }
                }
            }
        }

        FetchResult::loaded(url, decode_body(&body, content_type.as_deref()))
    }
}

impl PageFetcher for HttpFetcher {
    fn load(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        async move {
            let result = self.fetch(url).await;
            match &result.failure {
                Some(FetchFailure::Timeout) => tracing::warn!(
                    url,
                    bytes = result.html.len(),
                    "page load timed out; continuing with partial content"
                ),
                Some(failure) => tracing::warn!(url, error = %failure, "page load failed"),
                None => tracing::debug!(url, bytes = result.html.len(), "page loaded"),
            }
            result
        }
    }
}
