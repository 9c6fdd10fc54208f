//! Bing web search through its RSS output format.

use std::future::Future;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use socialscout_core::AppConfig;

use super::rss::parse_rss_items;
use super::{SearchBackend, SearchHit};
use crate::error::ScraperError;
use crate::pacing::Pacer;

pub struct BingSearch {
    client: Client,
    base_url: String,
    max_results: usize,
    pacer: Pacer,
}

impl BingSearch {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
        min_delay: Duration,
        max_results: usize,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results,
            pacer: Pacer::new(min_delay),
        })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.search_base_url,
            &config.user_agent,
            config.request_timeout_secs,
            Duration::from_millis(config.search_delay_ms),
            config.search_max_results,
        )
    }

    fn search_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        format!("{}/search?q={encoded}&format=rss", self.base_url)
    }
}

impl SearchBackend for BingSearch {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchHit>, ScraperError>> + Send {
        let url = self.search_url(query);
        async move {
            self.pacer.wait().await;

            let response = self.client.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                });
            }

            let body = response.text().await?;
            let hits = parse_rss_items(&body, self.max_results)?;
            tracing::debug!(url = %url, hits = hits.len(), "search completed");
            Ok(hits)
        }
    }
}
