use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use socialscout_core::Platform;

use super::{first_count, ProfileStrategy};
use crate::document::{element_text, Document};

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid regex"));
static POST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.,]+\s*[BKkMm万]?)\s*(?:[Pp]osts|件の投稿)|投稿\s*([\d.,]+\s*[BKkMm万]?)\s*件")
        .expect("valid regex")
});
static FOLLOWERS_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="followers"]"#).expect("valid selector"));
static TITLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[title]").expect("valid selector"));

pub struct InstagramStrategy;

impl ProfileStrategy for InstagramStrategy {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn domains(&self) -> &'static [&'static str] {
        &["instagram.com"]
    }

    fn canonical_host(&self) -> &'static str {
        "www.instagram.com"
    }

    fn excluded_subdomains(&self) -> &'static [&'static str] {
        &["help", "about", "business"]
    }

    fn excluded_paths(&self) -> &'static [&'static str] {
        &[
            "/p/",
            "/reel/",
            "/reels/",
            "/explore/",
            "/stories/",
            "/accounts/",
            "/direct/",
            "/tv/",
        ]
    }

    /// Instagram's non-profile sections are all top-level, while
    /// `/<handle>/reels` is the reels tab of a profile.
    fn is_excluded_path(&self, path: &str) -> bool {
        let probe = format!("{}/", path.trim_end_matches('/').to_ascii_lowercase());
        self.excluded_paths()
            .iter()
            .any(|marker| probe.starts_with(marker))
    }

    fn search_keyword(&self) -> &'static str {
        "instagram"
    }

    fn post_pattern(&self) -> &'static Regex {
        &POST_RE
    }

    fn profile_root(&self, segments: &[&str]) -> Option<String> {
        let handle = segments.first()?;
        if !HANDLE_RE.is_match(handle) {
            return None;
        }
        Some(format!("/{}", handle.to_ascii_lowercase()))
    }

    /// Exact counts live in a `title` attribute under the followers link
    /// (`title="1,744"`); the visible link text is abbreviated.
    fn structured_followers(&self, doc: &Document) -> u64 {
        let links: Vec<_> = doc.select(&FOLLOWERS_LINK).collect();

        let from_titles = first_count(
            links
                .iter()
                .flat_map(|link| link.select(&TITLED))
                .filter_map(|el| el.value().attr("title")),
        );
        if from_titles > 0 {
            return from_titles;
        }

        first_count(links.into_iter().map(element_text))
    }
}
