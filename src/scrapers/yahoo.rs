//! Yahoo News search results.
//!
//! Hits are `div`/`article` elements classed `NewsArticle` or `stream-item`.
//! The headline is the first `h2`/`h3`/`h4`, falling back to an anchor with a
//! `title`/`headline` class.

use super::{RawEntry, class_pattern, collect_entries, containers, find_tagged, first_link, published_of};
use crate::models::ArticleCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

const BASE: &str = "https://news.yahoo.com";

static ITEM: Lazy<Regex> = Lazy::new(|| class_pattern("NewsArticle|stream-item"));
static HEADLINE: Lazy<Regex> = Lazy::new(|| class_pattern("title|headline"));
static SUMMARY: Lazy<Regex> = Lazy::new(|| class_pattern("description|summary"));

pub fn parse(document: &Html) -> Vec<ArticleCandidate> {
    collect_entries(
        "yahoo_news",
        Some(BASE),
        containers(document, &["div", "article"], &ITEM),
        |item| RawEntry {
            title: find_tagged(item, &["h2", "h3", "h4"], None)
                .or_else(|| find_tagged(item, &["a"], Some(&*HEADLINE))),
            href: first_link(item),
            description: find_tagged(item, &["p", "div"], Some(&*SUMMARY)),
            published: published_of(item),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yahoo_listing() {
        let html = r#"<html><body><ol>
            <li><div class="NewsArticle">
                <h4><a href="/apple-stock-123.html">Apple stock jumps</a></h4>
                <p class="s-desc summary">Investors cheered the results.</p>
            </div></li>
            <li><article class="js-stream-item">
                <a class="headline" href="//finance.yahoo.com/x">Fallback headline</a>
            </article></li>
        </ol></body></html>"#;
        let document = Html::parse_document(html);
        let articles = parse(&document);
        assert_eq!(articles.len(), 2);

        assert_eq!(articles[0].title, "Apple stock jumps");
        assert_eq!(articles[0].url, "https://news.yahoo.com/apple-stock-123.html");
        assert_eq!(articles[0].description, "Investors cheered the results.");

        assert_eq!(articles[1].title, "Fallback headline");
        assert_eq!(articles[1].url, "https://finance.yahoo.com/x");
    }
}
