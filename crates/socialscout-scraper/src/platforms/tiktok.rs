use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use socialscout_core::Platform;

use super::{first_count, ProfileStrategy};
use crate::document::Document;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z0-9._]{2,24}$").expect("valid regex"));
static POST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.,]+\s*[BKkMm万]?)\s*(?:[Vv]ideos|[Pp]osts|本の動画|件の投稿)")
        .expect("valid regex")
});
static FOLLOWERS_COUNT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-e2e="followers-count"]"#).expect("valid selector")
});
static POST_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-e2e="user-post-item"]"#).expect("valid selector"));

pub struct TiktokStrategy;

impl ProfileStrategy for TiktokStrategy {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn domains(&self) -> &'static [&'static str] {
        &["tiktok.com"]
    }

    fn canonical_host(&self) -> &'static str {
        "www.tiktok.com"
    }

    fn excluded_subdomains(&self) -> &'static [&'static str] {
        &[
            "newsroom",
            "careers",
            "ads",
            "business",
            "support",
            "creators",
            "transparency",
        ]
    }

    fn excluded_paths(&self) -> &'static [&'static str] {
        &["/video/", "/tag/", "/discover/", "/search/", "/music/"]
    }

    fn search_keyword(&self) -> &'static str {
        "tiktok"
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

    fn structured_followers(&self, doc: &Document) -> u64 {
        first_count(doc.texts(&FOLLOWERS_COUNT))
    }

    /// TikTok shows no post total in the header; the rendered grid size is
    /// the best available lower bound.
    fn structured_posts(&self, doc: &Document) -> u64 {
        u64::try_from(doc.count(&POST_ITEM)).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::canonicalize;

    #[test]
    fn at_handle_urls_are_profiles() {
        assert_eq!(
            canonicalize(&TiktokStrategy, "https://www.tiktok.com/@Acme_Official?lang=ja").as_deref(),
            Some("https://www.tiktok.com/@acme_official")
        );
    }

    #[test]
    fn video_pages_and_bare_paths_are_rejected() {
        assert!(canonicalize(&TiktokStrategy, "https://www.tiktok.com/@acme/video/7312").is_none());
        assert!(canonicalize(&TiktokStrategy, "https://www.tiktok.com/tag/acme").is_none());
        assert!(canonicalize(&TiktokStrategy, "https://www.tiktok.com/acme").is_none());
        assert!(canonicalize(&TiktokStrategy, "https://newsroom.tiktok.com/@acme").is_none());
    }

    #[test]
    fn followers_and_grid_size_are_read() {
        let doc = Document::parse(
            r#"<strong data-e2e="followers-count">25.3K</strong>
               <div data-e2e="user-post-item"></div>
               <div data-e2e="user-post-item"></div>
               <div data-e2e="user-post-item"></div>"#,
        );
        assert_eq!(TiktokStrategy.structured_followers(&doc), 25_300);
        assert_eq!(TiktokStrategy.structured_posts(&doc), 3);
    }
}
