//! Reuters search results (`div.search-result-content`).

use super::{RawEntry, class_pattern, collect_entries, containers, find_tagged, first_link, published_of};
use crate::models::ArticleCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

const BASE: &str = "https://www.reuters.com";

static RESULT: Lazy<Regex> = Lazy::new(|| class_pattern("search-result-content"));

pub fn parse(document: &Html) -> Vec<ArticleCandidate> {
    collect_entries("reuters", Some(BASE), containers(document, &["div"], &RESULT), |result| RawEntry {
        title: find_tagged(result, &["h3"], None),
        href: first_link(result),
        description: find_tagged(result, &["p"], None),
        published: published_of(result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reuters_listing() {
        let html = r#"<html><body>
            <div class="search-result-content">
                <h3 class="search-result-title"><a href="/article/us-apple-idUS1">Apple beats forecasts</a></h3>
                <p>Apple Inc reported...</p>
                <time datetime="2025-05-06">May 6</time>
            </div>
            <div class="search-result-content"><p>orphan paragraph</p></div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let articles = parse(&document);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Apple beats forecasts");
        assert_eq!(articles[0].url, "https://www.reuters.com/article/us-apple-idUS1");
        assert_eq!(articles[0].description, "Apple Inc reported...");
        assert_eq!(articles[0].published, "2025-05-06");
    }
}
