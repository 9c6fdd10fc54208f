use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use socialscout_core::Platform;

use super::{capture_count, ProfileStrategy};
use crate::document::Document;

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("valid regex"));
static SUBSCRIBERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:チャンネル登録者数|登録者数|登録者)\s*([\d.,]+\s*[万億KkMmBb]?)|([\d.,]+\s*[万億KkMmBb]?)\s*(?:人\s*)?(?:subscribers|登録者)",
    )
    .expect("valid regex")
});
static VIDEOS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.,]+\s*[KkMm万]?)\s*(?:本の動画|[Vv]ideos)").expect("valid regex")
});
static HEADER_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#subscriber-count, #videos-count, yt-formatted-string, span")
        .expect("valid selector")
});

/// Path prefixes that address a channel by id or legacy name.
const CHANNEL_PREFIXES: [&str; 3] = ["channel", "c", "user"];

pub struct YoutubeStrategy;

impl YoutubeStrategy {
    fn header_count(doc: &Document, pattern: &Regex) -> u64 {
        doc.texts(&HEADER_TEXT)
            .iter()
            .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
            .map(|t| capture_count(pattern, t))
            .find(|n| *n > 0)
            .unwrap_or(0)
    }
}

impl ProfileStrategy for YoutubeStrategy {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn domains(&self) -> &'static [&'static str] {
        &["youtube.com"]
    }

    fn canonical_host(&self) -> &'static str {
        "www.youtube.com"
    }

    fn excluded_subdomains(&self) -> &'static [&'static str] {
        &["music", "studio", "support"]
    }

    fn excluded_paths(&self) -> &'static [&'static str] {
        &[
            "/watch/",
            "/playlist/",
            "/results/",
            "/shorts/",
            "/feed/",
            "/hashtag/",
            "/live/",
        ]
    }

    fn search_keyword(&self) -> &'static str {
        "youtube"
    }

    fn post_pattern(&self) -> &'static Regex {
        &VIDEOS_RE
    }

    fn profile_root(&self, segments: &[&str]) -> Option<String> {
        let first = segments.first()?;
        if let Some(handle) = first.strip_prefix('@') {
            if handle.is_empty() {
                return None;
            }
            return Some(format!("/{first}"));
        }
        if CHANNEL_PREFIXES.contains(first) {
            let id = segments.get(1)?;
            if ID_RE.is_match(id) {
                return Some(format!("/{first}/{id}"));
            }
        }
        None
    }

    fn structured_followers(&self, doc: &Document) -> u64 {
        Self::header_count(doc, &SUBSCRIBERS_RE)
    }

    fn structured_posts(&self, doc: &Document) -> u64 {
        Self::header_count(doc, &VIDEOS_RE)
    }
}
