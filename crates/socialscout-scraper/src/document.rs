//! Parsed HTML with the handful of queries profile validation needs.
//!
//! [`Document`] wraps [`scraper::Html`], which is not `Send`; parse it, query
//! it, and drop it before the next `.await`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").expect("valid selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Elements whose text never counts as visible page text.
const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// An anchor found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

pub struct Document {
    html: Html,
}

impl Document {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Visible text of the body, whitespace-collapsed, with script and style
    /// content excluded.
    #[must_use]
    pub fn text(&self) -> String {
        let root = self
            .html
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| self.html.root_element());

        let mut pieces: Vec<&str> = Vec::new();
        for node in root.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                pieces.extend(text.split_whitespace());
            }
        }
        pieces.join(" ")
    }

    /// Content of the first `<meta>` whose `name` or `property` equals `key`
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<String> {
        self.html.select(&META_SELECTOR).find_map(|el| {
            let value = el.value();
            let matches = [value.attr("name"), value.attr("property")]
                .into_iter()
                .flatten()
                .any(|k| k.eq_ignore_ascii_case(key));
            if matches {
                value.attr("content").map(|c| c.trim().to_string())
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    /// Whitespace-collapsed text of every element matching `selector`.
    #[must_use]
    pub fn texts(&self, selector: &Selector) -> Vec<String> {
        self.html.select(selector).map(element_text).collect()
    }

    #[must_use]
    pub fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }

    /// Elements matching `selector`, for queries that need to descend further.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// Every anchor with a non-empty `href`, in document order.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        self.html
            .select(&ANCHOR_SELECTOR)
            .filter_map(|el| {
                let href = el.value().attr("href")?.trim();
                if href.is_empty() {
                    return None;
                }
                Some(Link {
                    href: href.to_string(),
                    text: element_text(el),
                })
            })
            .collect()
    }
}

/// Whitespace-collapsed text content of a single element.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
