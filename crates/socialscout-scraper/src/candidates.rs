//! Candidate profile URLs for a company on one platform.
//!
//! Raw URLs come from two places: links on the company's own website, and
//! web search hits for `"<company> <platform keyword>"`. They are offered in
//! this order:
//!
//! 1. links found on the official website,
//! 2. search hits whose snippet carries an official marker,
//! 3. all other search hits,
//!
//! each group keeping first-seen order. [`Candidates`] canonicalizes lazily,
//! dropping excluded or non-profile URLs and duplicates as it goes, so a
//! caller that stops at the first accepted candidate never pays for the rest.

use std::collections::HashSet;

use socialscout_core::Platform;

use crate::document::{Document, Link};
use crate::fetch::PageFetcher;
use crate::normalize::normalize_text;
use crate::platforms::{canonicalize, strategy_for, ProfileStrategy};
use crate::search::{SearchBackend, SearchHit};
use crate::validate::has_official_marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    OfficialSite,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical profile URL.
    pub url: String,
    /// Link text or search snippet the URL was found with.
    pub display_text: Option<String>,
    pub origin: CandidateOrigin,
}

pub struct CandidateSource<'a, S, F> {
    strategy: &'static dyn ProfileStrategy,
    search: &'a S,
    fetcher: &'a F,
    scan_official_site: bool,
}

impl<'a, S, F> CandidateSource<'a, S, F>
where
    S: SearchBackend,
    F: PageFetcher,
{
    #[must_use]
    pub fn new(platform: Platform, search: &'a S, fetcher: &'a F) -> Self {
        Self {
            strategy: strategy_for(platform),
            search,
            fetcher,
            scan_official_site: true,
        }
    }

    #[must_use]
    pub fn with_official_site_scan(mut self, enabled: bool) -> Self {
        self.scan_official_site = enabled;
        self
    }

    #[must_use]
    pub fn query(&self, company_name: &str) -> String {
        format!(
            "{} {}",
            normalize_text(company_name),
            self.strategy.search_keyword()
        )
    }

    /// Gathers raw candidates for `company_name`. Site and search failures
    /// are logged and contribute no candidates.
    pub async fn candidates(&self, company_name: &str, known_website: Option<&str>) -> Candidates {
        let mut raw = Vec::new();

        if self.scan_official_site {
            if let Some(website) = known_website.map(str::trim).filter(|w| !w.is_empty()) {
                raw.extend(self.official_site_links(website).await);
            }
        }

        let query = self.query(company_name);
        match self.search.search(&query).await {
            Ok(hits) => raw.extend(order_search_hits(hits)),
            Err(e) => {
                tracing::warn!(
                    platform = %self.strategy.platform(),
                    query = %query,
                    error = %e,
                    "search failed; continuing without search candidates"
                );
            }
        }

        Candidates {
            strategy: self.strategy,
            raw: raw.into_iter(),
            seen: HashSet::new(),
        }
    }

    async fn official_site_links(&self, website: &str) -> Vec<RawCandidate> {
        let url = if website.contains("://") {
            website.to_string()
        } else {
            format!("https://{website}")
        };

        let fetched = self.fetcher.load(&url).await;
        if !fetched.is_usable() {
            tracing::warn!(
                platform = %self.strategy.platform(),
                url = %url,
                "official site could not be loaded; skipping link scan"
            );
            return Vec::new();
        }

        let links = site_links(&fetched.html);
        let strategy = self.strategy;
        let found: Vec<RawCandidate> = links
            .into_iter()
            .filter(|link| canonicalize(strategy, &link.href).is_some())
            .map(|link| RawCandidate {
                url: link.href,
                display_text: Some(link.text).filter(|t| !t.is_empty()),
                origin: CandidateOrigin::OfficialSite,
            })
            .collect();
        tracing::debug!(
            platform = %strategy.platform(),
            url = %url,
            links = found.len(),
            "official site scanned"
        );
        found
    }
}

struct RawCandidate {
    url: String,
    display_text: Option<String>,
    origin: CandidateOrigin,
}

fn site_links(html: &str) -> Vec<Link> {
    Document::parse(html).links()
}

/// Stable partition of search hits: official-marker snippets first.
fn order_search_hits(hits: Vec<SearchHit>) -> Vec<RawCandidate> {
    let (official, others): (Vec<_>, Vec<_>) = hits
        .into_iter()
        .partition(|hit| has_official_marker(&normalize_text(&hit.snippet)));
    official
        .into_iter()
        .chain(others)
        .map(|hit| RawCandidate {
            url: hit.url,
            display_text: Some(hit.snippet).filter(|s| !s.is_empty()),
            origin: CandidateOrigin::Search,
        })
        .collect()
}

/// Lazily filtered, deduplicated candidate sequence. Not restartable.
pub struct Candidates {
    strategy: &'static dyn ProfileStrategy,
    raw: std::vec::IntoIter<RawCandidate>,
    seen: HashSet<String>,
}

#[cfg(test)]
impl Candidates {
    /// A sequence over already-known URLs, filtered like search results.
    fn from_urls<I>(platform: Platform, urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let raw: Vec<RawCandidate> = urls
            .into_iter()
            .map(|url| RawCandidate {
                url,
                display_text: None,
                origin: CandidateOrigin::Search,
            })
            .collect();
        Self {
            strategy: strategy_for(platform),
            raw: raw.into_iter(),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for raw in self.raw.by_ref() {
            let Some(url) = canonicalize(self.strategy, &raw.url) else {
                tracing::debug!(url = %raw.url, "dropping non-profile candidate");
                continue;
            };
            if !self.seen.insert(url.clone()) {
                continue;
            }
            return Some(Candidate {
                url,
                display_text: raw.display_text,
                origin: raw.origin,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use super::*;
    use crate::error::ScraperError;
    use crate::fetch::{FetchFailure, FetchResult};

    struct FakeSearch {
        hits: Vec<SearchHit>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn new(hits: &[(&str, &str)]) -> Self {
            Self {
                hits: hits
                    .iter()
                    .map(|(url, snippet)| SearchHit {
                        url: (*url).to_string(),
                        snippet: (*snippet).to_string(),
                    })
                    .collect(),
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl SearchBackend for FakeSearch {
        fn search(
            &self,
            query: &str,
        ) -> impl Future<Output = Result<Vec<SearchHit>, ScraperError>> + Send {
            self.queries.lock().unwrap().push(query.to_string());
            let result = if self.fail {
                Err(ScraperError::UnexpectedStatus {
                    status: 503,
                    url: "https://search.test".to_string(),
                })
            } else {
                Ok(self.hits.clone())
            };
            async move { result }
        }
    }

    struct FakeSite {
        html: Option<String>,
    }

    impl PageFetcher for FakeSite {
        fn load(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
            let result = match &self.html {
                Some(html) => FetchResult::loaded(url, html.clone()),
                None => FetchResult::failed(url, FetchFailure::Network("refused".into())),
            };
            async move { result }
        }
    }

    fn urls(candidates: Candidates) -> Vec<String> {
        candidates.map(|c| c.url).collect()
    }

    #[tokio::test]
    async fn official_snippets_come_first_and_duplicates_are_dropped() {
        let search = FakeSearch::new(&[
            ("https://www.instagram.com/acme_fan/", "Acme fan page"),
            ("https://www.instagram.com/p/xyz/", "Acme post"),
            ("https://www.instagram.com/acme/", "Acme公式 Instagram"),
            ("https://instagram.com/acme_fan", "again"),
            ("https://example.com/acme", "Acme official site"),
        ]);
        let site = FakeSite { html: None };
        let source = CandidateSource::new(Platform::Instagram, &search, &site);
        let found = urls(source.candidates("Acme", None).await);
        assert_eq!(
            found,
            vec![
                "https://www.instagram.com/acme".to_string(),
                "https://www.instagram.com/acme_fan".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn official_site_links_precede_search_hits() {
        let search = FakeSearch::new(&[("https://x.com/acme_news", "Acme official news")]);
        let site = FakeSite {
            html: Some(
                r#"<footer><a href="https://twitter.com/AcmeJP">X</a>
                   <a href="https://www.instagram.com/acme">IG</a></footer>"#
                    .to_string(),
            ),
        };
        let source = CandidateSource::new(Platform::X, &search, &site);
        let found: Vec<Candidate> = source
            .candidates("Acme", Some("acme.co.jp"))
            .await
            .collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].url, "https://x.com/AcmeJP");
        assert_eq!(found[0].origin, CandidateOrigin::OfficialSite);
        assert_eq!(found[0].display_text.as_deref(), Some("X"));
        assert_eq!(found[1].url, "https://x.com/acme_news");
        assert_eq!(found[1].origin, CandidateOrigin::Search);
    }

    #[tokio::test]
    async fn site_scan_can_be_disabled() {
        let search = FakeSearch::new(&[]);
        let site = FakeSite {
            html: Some(r#"<a href="https://x.com/acme">X</a>"#.to_string()),
        };
        let source = CandidateSource::new(Platform::X, &search, &site).with_official_site_scan(false);
        assert!(urls(source.candidates("Acme", Some("acme.com")).await).is_empty());
    }

    #[tokio::test]
    async fn failures_yield_no_candidates() {
        let mut search = FakeSearch::new(&[("https://x.com/acme", "Acme")]);
        search.fail = true;
        let site = FakeSite { html: None };
        let source = CandidateSource::new(Platform::X, &search, &site);
        assert!(urls(source.candidates("Acme", Some("acme.com")).await).is_empty());
    }

    #[tokio::test]
    async fn query_uses_platform_keyword() {
        let search = FakeSearch::new(&[]);
        let site = FakeSite { html: None };
        let source = CandidateSource::new(Platform::Youtube, &search, &site);
        let _ = source.candidates("ＡＣＭＥ株式会社", None).await;
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            ["ACME株式会社 youtube".to_string()]
        );
    }

    #[test]
    fn from_urls_filters_and_dedupes() {
        let found = urls(Candidates::from_urls(
            Platform::Tiktok,
            [
                "https://www.tiktok.com/@acme".to_string(),
                "https://www.tiktok.com/@acme/video/1".to_string(),
                "tiktok.com/@ACME".to_string(),
            ],
        ));
        assert_eq!(found, vec!["https://www.tiktok.com/@acme".to_string()]);
    }
}
