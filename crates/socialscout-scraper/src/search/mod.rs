//! Web search: turning a query into ranked result URLs with snippets.

mod bing;
mod rss;

use std::future::Future;

use crate::error::ScraperError;

pub use bing::BingSearch;

/// One search result: the target URL and the visible text shown with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub snippet: String,
}

pub trait SearchBackend {
    /// Runs `query` and returns hits in rank order.
    fn search(&self, query: &str)
        -> impl Future<Output = Result<Vec<SearchHit>, ScraperError>> + Send;
}
