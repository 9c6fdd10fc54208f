//! RSS item extraction for search result feeds.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::SearchHit;
use crate::error::ScraperError;

/// Parses `<item>` elements into [`SearchHit`]s, snippet being the title
/// followed by the HTML-stripped description. Items without a link are
/// skipped. Stops after `max_hits` hits.
pub(super) fn parse_rss_items(xml: &str, max_hits: usize) -> Result<Vec<SearchHit>, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut hits = Vec::new();
    let mut in_item = false;
    let mut in_description = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                }
                if in_item && name == "description" {
                    in_description = true;
                }
                current_tag = name;
            }
            Event::End(e) => {
                if e.name().as_ref() == b"description" {
                    in_description = false;
                }
                if e.name().as_ref() == b"item" && in_item {
                    in_item = false;
                    if !link.is_empty() {
                        let snippet = strip_html(&format!("{title} {description}"));
                        hits.push(SearchHit {
                            url: link.clone(),
                            snippet,
                        });
                        if hits.len() >= max_hits {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            // Text after nested markup such as `<b>` still belongs to the
            // description even though `current_tag` no longer says so.
            Event::Text(e) if in_item => {
                let text = e.unescape().unwrap_or_default().into_owned();
                let tag = if in_description { "description" } else { current_tag.as_str() };
                append_field(tag, &text, &mut title, &mut link, &mut description);
            }
            Event::CData(e) if in_item => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                let tag = if in_description { "description" } else { current_tag.as_str() };
                append_field(tag, &text, &mut title, &mut link, &mut description);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(hits)
}

fn append_field(
    tag: &str,
    text: &str,
    title: &mut String,
    link: &mut String,
    description: &mut String,
) {
    let target = match tag {
        "title" => title,
        "link" => link,
        "description" => description,
        _ => return,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text.trim());
}

/// Strip HTML tags from a string and normalize whitespace.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rss version="2.0"><channel>
  <title>Bing: acme instagram</title>
  <link>https://www.bing.com/search?q=acme</link>
  <item>
    <title>Acme (@acme_jp) &amp; friends</title>
    <link>https://www.instagram.com/acme_jp/</link>
    <description>Acme公式アカウント 1.2万 Followers</description>
  </item>
  <item>
    <title>No link here</title>
    <description>skipped</description>
  </item>
  <item>
    <title>Acme news</title>
    <link>https://example.com/acme</link>
    <description><![CDATA[<b>Acme</b> opens a store]]></description>
  </item>
</channel></rss>"#;

    #[test]
    fn items_become_hits_with_title_and_description() {
        let hits = parse_rss_items(FEED, 10).expect("parse");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://www.instagram.com/acme_jp/");
        assert_eq!(
            hits[0].snippet,
            "Acme (@acme_jp) & friends Acme公式アカウント 1.2万 Followers"
        );
        assert_eq!(hits[1].snippet, "Acme news Acme opens a store");
    }

    #[test]
    fn nested_markup_in_description_keeps_all_text() {
        let xml = r#"<rss><channel><item>
            <title>Acme (@acme)</title>
            <link>https://x.com/acme</link>
            <description>Acme <b>公式</b> アカウント</description>
        </item></channel></rss>"#;
        let hits = parse_rss_items(xml, 10).expect("parse");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].snippet, "Acme (@acme) Acme 公式 アカウント");
    }

    #[test]
    fn channel_level_link_is_not_a_hit() {
        let hits = parse_rss_items(FEED, 10).expect("parse");
        assert!(hits.iter().all(|h| !h.url.contains("bing.com")));
    }

    #[test]
    fn max_hits_caps_results() {
        let hits = parse_rss_items(FEED, 1).expect("parse");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn empty_feed_yields_no_hits() {
        let hits = parse_rss_items("<rss><channel></channel></rss>", 10).expect("parse");
        assert!(hits.is_empty());
    }

    #[test]
    fn strip_html_collapses_tags_and_whitespace() {
        assert_eq!(strip_html("<p>a</p>\n<p>b  c</p>"), "a b c");
    }
}
