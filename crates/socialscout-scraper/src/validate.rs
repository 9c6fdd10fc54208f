//! Accept/reject decisions for candidate profile pages.
//!
//! Every platform shares one rule: a page is accepted when it carries at
//! least one identity signal (company name, official marker, or the
//! company's website domain) and does not show a post count that is known
//! and below the platform threshold. A post count of `0` means the count
//! could not be read and never causes a rejection.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use socialscout_core::Platform;

use crate::document::Document;
use crate::fetch::{FetchFailure, FetchResult};
use crate::normalize::{contains_name, normalize_company_name, normalize_text};
use crate::platforms::{canonicalize, capture_count, strategy_for, ProfileStrategy};

/// Follower or subscriber count in free text, either label-first
/// (`フォロワー1,234人`) or number-first (`1.2万 Followers`).
static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:フォロワー|チャンネル登録者数|登録者数)\s*[:：]?\s*([\d.,]+\s*[万億KkMmBb]?)|([0-9][0-9.,]*\s*[KkMmBb万億]?)\s*(?:人\s*)?(?:Followers|followers|フォロワー|subscribers|登録者)",
    )
    .expect("valid regex")
});

/// Website domains this short or shorter are too noisy to match on.
const MIN_DOMAIN_LEN: usize = 5;

/// Which identity signals a page showed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSignals {
    pub name: bool,
    pub official: bool,
    pub domain: bool,
}

impl MatchSignals {
    #[must_use]
    pub fn any(self) -> bool {
        self.name || self.official || self.domain
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    FetchFailed(FetchFailure),
    NotAProfile,
    NoIdentitySignal,
    LowPostCount { posts: u64, threshold: u64 },
}

impl RejectReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchFailed(_) => "fetch_failed",
            Self::NotAProfile => "not_a_profile",
            Self::NoIdentitySignal => "no_identity_signal",
            Self::LowPostCount { .. } => "low_post_count",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(failure) => write!(f, "fetch_failed ({failure})"),
            Self::LowPostCount { posts, threshold } => {
                write!(f, "low_post_count ({posts} < {threshold})")
            }
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: bool,
    /// Parsed follower count when accepted; always `0` on rejection.
    pub follower_count: u64,
    /// Canonical profile URL, or the trimmed input when it has no canonical form.
    pub resolved_url: String,
    pub post_count: u64,
    pub signals: MatchSignals,
    pub reason: Option<RejectReason>,
}

impl ValidationOutcome {
    fn rejected(resolved_url: String, reason: RejectReason) -> Self {
        Self {
            accepted: false,
            follower_count: 0,
            resolved_url,
            post_count: 0,
            signals: MatchSignals::default(),
            reason: Some(reason),
        }
    }
}

/// The shared decision rule.
///
/// # Errors
///
/// Returns the [`RejectReason`] when the page is rejected.
pub fn decide(signals: MatchSignals, post_count: u64, threshold: u64) -> Result<(), RejectReason> {
    if !signals.any() {
        return Err(RejectReason::NoIdentitySignal);
    }
    if post_count > 0 && post_count < threshold {
        return Err(RejectReason::LowPostCount {
            posts: post_count,
            threshold,
        });
    }
    Ok(())
}

/// Host part of a website URL with scheme, userinfo, port, and leading
/// `www.` removed, lowercased. A bare `example.com` is read as `https`.
/// `None` when nothing usable remains.
#[must_use]
pub fn registered_domain(website: &str) -> Option<String> {
    let trimmed = website.trim();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// `true` when `text` carries a `公式` or case-insensitive `official` token.
pub(crate) fn has_official_marker(text: &str) -> bool {
    text.contains("公式") || text.to_lowercase().contains("official")
}

/// Validates rendered candidate pages for one platform.
pub struct ProfileValidator {
    strategy: &'static dyn ProfileStrategy,
    threshold: u64,
}

impl ProfileValidator {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        let strategy = strategy_for(platform);
        Self {
            strategy,
            threshold: strategy.post_count_threshold(),
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.strategy.platform()
    }

    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Canonical profile URL for `url`, or `None` when it is not a profile
    /// on this platform.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<String> {
        canonicalize(self.strategy, url)
    }

    /// Validates a retrieval result. Hard failures reject with
    /// [`RejectReason::FetchFailed`]; a timed-out load is validated on
    /// whatever partial content arrived.
    #[must_use]
    pub fn validate_fetch(
        &self,
        fetch: &FetchResult,
        company_name: &str,
        known_website: Option<&str>,
    ) -> ValidationOutcome {
        if !fetch.is_usable() {
            let failure = fetch.failure.clone().unwrap_or(FetchFailure::Timeout);
            let resolved = self.resolve(&fetch.url).unwrap_or_else(|| fetch.url.trim().to_string());
            let reason = RejectReason::FetchFailed(failure);
            tracing::info!(
                platform = %self.platform(),
                url = %resolved,
                reason = %reason,
                "candidate rejected"
            );
            return ValidationOutcome::rejected(resolved, reason);
        }
        self.validate(&fetch.url, &fetch.html, company_name, known_website)
    }

    /// Decides whether `html`, the page at `url`, is `company_name`'s profile
    /// and extracts its follower count.
    #[must_use]
    pub fn validate(
        &self,
        url: &str,
        html: &str,
        company_name: &str,
        known_website: Option<&str>,
    ) -> ValidationOutcome {
        let platform = self.platform();
        let Some(resolved_url) = self.resolve(url) else {
            tracing::info!(
                %platform,
                url,
                reason = RejectReason::NotAProfile.as_str(),
                "candidate rejected"
            );
            return ValidationOutcome::rejected(url.trim().to_string(), RejectReason::NotAProfile);
        };

        let doc = Document::parse(html);
        let page_text = normalize_text(&doc.text());
        let description = doc
            .meta("description")
            .or_else(|| doc.meta("og:description"))
            .map(|d| normalize_text(&d))
            .unwrap_or_default();
        let title = doc.title().map(|t| normalize_text(&t)).unwrap_or_default();
        let identity_text = format!("{title} {description} {page_text}");

        let signals = MatchSignals {
            name: contains_name(&identity_text, &normalize_company_name(company_name)),
            official: has_official_marker(&identity_text),
            domain: known_website
                .and_then(registered_domain)
                .filter(|d| d.chars().count() >= MIN_DOMAIN_LEN)
                .is_some_and(|d| identity_text.to_lowercase().contains(&d)),
        };

        let followers = [
            self.strategy.structured_followers(&doc),
            capture_count(&FOLLOWERS_RE, &description),
            capture_count(&FOLLOWERS_RE, &page_text),
        ]
        .into_iter()
        .find(|n| *n > 0)
        .unwrap_or(0);

        let posts = [
            self.strategy.structured_posts(&doc),
            capture_count(self.strategy.post_pattern(), &description),
            capture_count(self.strategy.post_pattern(), &page_text),
        ]
        .into_iter()
        .find(|n| *n > 0)
        .unwrap_or(0);

        tracing::debug!(
            %platform,
            url = %resolved_url,
            followers,
            posts,
            name_match = signals.name,
            official_match = signals.official,
            domain_match = signals.domain,
            "extracted profile stats"
        );

        match decide(signals, posts, self.threshold) {
            Ok(()) => {
                tracing::info!(%platform, url = %resolved_url, followers, posts, "candidate accepted");
                ValidationOutcome {
                    accepted: true,
                    follower_count: followers,
                    resolved_url,
                    post_count: posts,
                    signals,
                    reason: None,
                }
            }
            Err(reason) => {
                tracing::info!(
                    %platform,
                    url = %resolved_url,
                    posts,
                    reason = reason.as_str(),
                    "candidate rejected"
                );
                ValidationOutcome {
                    accepted: false,
                    follower_count: 0,
                    resolved_url,
                    post_count: posts,
                    signals,
                    reason: Some(reason),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
