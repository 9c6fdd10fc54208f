//! Per-platform knowledge: which hosts and paths are profiles, how a profile
//! URL is canonicalized, and where a rendered profile page exposes its
//! follower and post counts.
//!
//! The discovery and validation engines are shared; everything that differs
//! between X, Instagram, TikTok and YouTube lives behind [`ProfileStrategy`].

mod instagram;
mod tiktok;
mod x;
mod youtube;

use regex::Regex;
use reqwest::Url;
use socialscout_core::Platform;

use crate::document::Document;
use crate::parse::parse_count;

pub use instagram::InstagramStrategy;
pub use tiktok::TiktokStrategy;
pub use x::XStrategy;
pub use youtube::YoutubeStrategy;

pub trait ProfileStrategy: Send + Sync {
    fn platform(&self) -> Platform;

    /// Registrable domains served by the platform. Any subdomain of these
    /// is considered a platform host unless listed in
    /// [`excluded_subdomains`](Self::excluded_subdomains).
    fn domains(&self) -> &'static [&'static str];

    /// Host used in canonical profile URLs.
    fn canonical_host(&self) -> &'static str;

    /// Leading host labels that never serve profiles (`help`, `business`, ...).
    fn excluded_subdomains(&self) -> &'static [&'static str];

    /// Lowercase path markers for non-profile pages, matched against the
    /// URL path with a trailing slash appended.
    fn excluded_paths(&self) -> &'static [&'static str];

    /// Word appended to the company name when querying the search backend.
    fn search_keyword(&self) -> &'static str;

    /// Matches a post or video count in free text; the first capture group
    /// that participates in the match holds the number.
    fn post_pattern(&self) -> &'static Regex;

    /// Canonical profile path (`/acme`, `/@acme`, `/channel/UC...`) for the
    /// given path segments, or `None` when the path is not profile-shaped.
    fn profile_root(&self, segments: &[&str]) -> Option<String>;

    /// Follower count read from platform-specific markup; `0` when absent.
    fn structured_followers(&self, _doc: &Document) -> u64 {
        0
    }

    /// Post or video count read from platform-specific markup; `0` when absent.
    fn structured_posts(&self, _doc: &Document) -> u64 {
        0
    }

    fn is_excluded_path(&self, path: &str) -> bool {
        let probe = format!("{}/", path.trim_end_matches('/').to_ascii_lowercase());
        self.excluded_paths().iter().any(|marker| probe.contains(marker))
    }

    fn matches_host(&self, host: &str) -> bool {
        self.domains()
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }

    fn is_excluded_host(&self, host: &str) -> bool {
        let first_label = host.split('.').next().unwrap_or_default();
        self.excluded_subdomains().contains(&first_label)
    }

    fn post_count_threshold(&self) -> u64 {
        self.platform().default_post_threshold()
    }
}

static X: XStrategy = XStrategy;
static INSTAGRAM: InstagramStrategy = InstagramStrategy;
static TIKTOK: TiktokStrategy = TiktokStrategy;
static YOUTUBE: YoutubeStrategy = YoutubeStrategy;

#[must_use]
pub fn strategy_for(platform: Platform) -> &'static dyn ProfileStrategy {
    match platform {
        Platform::X => &X,
        Platform::Instagram => &INSTAGRAM,
        Platform::Tiktok => &TIKTOK,
        Platform::Youtube => &YOUTUBE,
    }
}

/// Canonicalizes `raw` into a profile URL for `strategy`'s platform.
///
/// Returns `None` for foreign hosts, excluded hosts or paths, and URLs whose
/// path does not have the platform's profile shape. The result always uses
/// `https`, the platform's canonical host, and the profile root path with no
/// query, fragment, or trailing slash.
#[must_use]
pub fn canonicalize(strategy: &dyn ProfileStrategy, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw.trim_start_matches('/'))
    };

    let url = Url::parse(&with_scheme).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    if !strategy.matches_host(&host) || strategy.is_excluded_host(&host) {
        return None;
    }

    let path = url.path();
    if strategy.is_excluded_path(path) {
        return None;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let root = strategy.profile_root(&segments)?;
    Some(format!("https://{}{root}", strategy.canonical_host()))
}

/// Count captured by the first match of `pattern` in `text`, read from the
/// first capture group that participates; `0` when nothing matches.
pub(crate) fn capture_count(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures(text)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map_or(0, |m| parse_count(m.as_str()))
}

/// First non-zero count among `texts`, parsed with [`parse_count`].
fn first_count<I, S>(texts: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| parse_count(t.as_ref()))
        .find(|n| *n > 0)
        .unwrap_or(0)
}
