use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use socialscout_core::Platform;

use super::{first_count, ProfileStrategy};
use crate::document::Document;
use crate::parse::parse_count;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex"));
static POST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.,]+\s*[BKkMm万]?)\s*(?:posts|Posts|件のポスト)").expect("valid regex")
});
static FOLLOWERS_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href$="/followers"], a[href$="/verified_followers"]"#)
        .expect("valid selector")
});
static HEADER_STATS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid="primaryColumn"] h2 + div"#).expect("valid selector")
});

/// First path segments that belong to the X application rather than to
/// an account.
const RESERVED_HANDLES: [&str; 16] = [
    "home",
    "explore",
    "search",
    "i",
    "notifications",
    "messages",
    "settings",
    "login",
    "signup",
    "tos",
    "privacy",
    "hashtag",
    "intent",
    "share",
    "compose",
    "about",
];

pub struct XStrategy;

impl ProfileStrategy for XStrategy {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn domains(&self) -> &'static [&'static str] {
        &["x.com", "twitter.com"]
    }

    fn canonical_host(&self) -> &'static str {
        "x.com"
    }

    fn excluded_subdomains(&self) -> &'static [&'static str] {
        &["help", "business", "developer", "careers"]
    }

    fn excluded_paths(&self) -> &'static [&'static str] {
        &[
            "/status/",
            "/search/",
            "/hashtag/",
            "/i/",
            "/explore/",
            "/intent/",
            "/share/",
            "/home/",
        ]
    }

    fn search_keyword(&self) -> &'static str {
        "x.com"
    }

    fn post_pattern(&self) -> &'static Regex {
        &POST_RE
    }

    fn profile_root(&self, segments: &[&str]) -> Option<String> {
        let handle = segments.first()?;
        if !HANDLE_RE.is_match(handle) {
            return None;
        }
        if RESERVED_HANDLES.contains(&handle.to_ascii_lowercase().as_str()) {
            return None;
        }
        Some(format!("/{handle}"))
    }

    fn structured_followers(&self, doc: &Document) -> u64 {
        first_count(doc.texts(&FOLLOWERS_LINK))
    }

    fn structured_posts(&self, doc: &Document) -> u64 {
        doc.texts(&HEADER_STATS)
            .into_iter()
            .find(|t| t.to_lowercase().contains("post") || t.contains("ポスト"))
            .map_or(0, |t| parse_count(&t))
    }
}
