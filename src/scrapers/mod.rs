//! Listing-page parsers for each supported search provider.
//!
//! A listing page is the HTML returned by a provider's search URL. Which
//! routine parses it is decided by [`ListingParser::detect`], a substring match
//! of the listing URL against a fixed, ordered marker table:
//!
//! | Marker | Routine | Module | Root-relative links resolve against |
//! |--------|---------|--------|-------------------------------------|
//! | `google` | Google News | [`google`] | `https://news.google.com` |
//! | `bing` | Bing News | [`bing`] | `https://www.bing.com` |
//! | `yahoo` | Yahoo News | [`yahoo`] | `https://news.yahoo.com` |
//! | `reuters` | Reuters | [`reuters`] | `https://www.reuters.com` |
//! | `ft.com` | Financial Times | [`ft`] | `https://www.ft.com` |
//! | *(none)* | Generic | [`generic`] | origin of the listing URL |
//!
//! Markers are matched against the whole search URL, query string included,
//! so a query mentioning `google`, `bing` or `yahoo` can route another
//! provider's page to the wrong routine. That routine then usually finds no
//! containers and the source contributes nothing.
//!
//! # Common Patterns
//!
//! Each routine walks provider-specific container elements in document order
//! and, per container, looks up a title, a link and optionally a description
//! and a `time[datetime]` stamp, trying an ordered list of candidates per
//! field. Containers without a title or link are skipped silently; a container
//! whose title or link turns out blank is logged and skipped without affecting
//! its siblings.

pub mod bing;
pub mod ft;
pub mod generic;
pub mod google;
pub mod reuters;
pub mod yahoo;

use crate::error::{Result, SearchError};
use crate::models::{ArticleCandidate, ContentSource};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static TIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[datetime]").expect("valid selector"));

/// One routine per known provider plus the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingParser {
    GoogleNews,
    BingNews,
    YahooNews,
    Reuters,
    FinancialTimes,
    Generic,
}

const MARKERS: [(&str, ListingParser); 5] = [
    ("google", ListingParser::GoogleNews),
    ("bing", ListingParser::BingNews),
    ("yahoo", ListingParser::YahooNews),
    ("reuters", ListingParser::Reuters),
    ("ft.com", ListingParser::FinancialTimes),
];

impl ListingParser {
    /// First marker contained in `source_url` wins; no match means generic.
    pub fn detect(source_url: &str) -> Self {
        MARKERS
            .iter()
            .find(|(marker, _)| source_url.contains(marker))
            .map(|(_, parser)| *parser)
            .unwrap_or(ListingParser::Generic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListingParser::GoogleNews => "google_news",
            ListingParser::BingNews => "bing_news",
            ListingParser::YahooNews => "yahoo_news",
            ListingParser::Reuters => "reuters",
            ListingParser::FinancialTimes => "financial_times",
            ListingParser::Generic => "generic",
        }
    }

    /// Run this routine over a parsed listing document.
    pub fn parse(&self, document: &Html, source_url: &str) -> Vec<ArticleCandidate> {
        match self {
            ListingParser::GoogleNews => google::parse(document),
            ListingParser::BingNews => bing::parse(document),
            ListingParser::YahooNews => yahoo::parse(document),
            ListingParser::Reuters => reuters::parse(document),
            ListingParser::FinancialTimes => ft::parse(document),
            ListingParser::Generic => generic::parse(document, origin_of(source_url).as_deref()),
        }
    }
}

/// Parse a listing page into candidates stamped with `source`'s name and category.
///
/// # Arguments
///
/// * `html` - Body of the listing page
/// * `source_url` - URL the page was fetched from; selects the routine and,
///   for the generic routine, the base for root-relative links
/// * `source` - Source whose `name` and `category` are copied onto each candidate
///
/// # Returns
///
/// Candidates in document order with normalized URLs. Entries that cannot be
/// read are skipped, so a page with an unexpected layout yields an empty list.
pub fn parse_listing(html: &str, source_url: &str, source: &ContentSource) -> Vec<ArticleCandidate> {
    let document = Html::parse_document(html);
    let parser = ListingParser::detect(source_url);
    let mut articles = parser.parse(&document, source_url);
    debug!(
        parser = parser.name(),
        count = articles.len(),
        source = %source.name,
        "Parsed listing page"
    );

    for article in &mut articles {
        article.source = source.name.clone();
        article.category = source.category.clone();
    }
    articles
}

/// Turn a raw `href`/`src` value into an absolute URL.
///
/// - `//host/path` gets an `https:` prefix
/// - `/path` is joined to the scheme and host of `base`; without a usable
///   base it is returned unchanged
/// - anything else not starting with `http` gets an `https://` prefix
/// - everything else is returned as is
///
/// # Examples
///
/// ```
/// use noovox_search::scrapers::normalize_url;
///
/// assert_eq!(normalize_url("//x.com/a", None), "https://x.com/a");
/// assert_eq!(normalize_url("/a", Some("https://x.com/b/c")), "https://x.com/a");
/// assert_eq!(normalize_url("x.com/a", None), "https://x.com/a");
/// assert_eq!(normalize_url("https://x.com/a", None), "https://x.com/a");
/// ```
pub fn normalize_url(url: &str, base: Option<&str>) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else if url.starts_with('/') {
        match base.and_then(origin_of) {
            Some(origin) => format!("{origin}{url}"),
            None => url.to_string(),
        }
    } else if !url.starts_with("http") {
        format!("https://{url}")
    } else {
        url.to_string()
    }
}

/// `scheme://host[:port]` of `url`, if it has one.
pub(crate) fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Compile a case-insensitive class pattern.
pub(crate) fn class_pattern(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid class pattern")
}

/// Parse a static selector list, dropping entries the CSS parser rejects.
pub(crate) fn selectors(list: &[&str]) -> Vec<Selector> {
    list.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

pub(crate) fn has_class(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element.value().classes().any(|class| pattern.is_match(class))
}

fn tag_matches(element: &ElementRef<'_>, tags: &[&str]) -> bool {
    let name = element.value().name();
    tags.is_empty() || tags.iter().any(|tag| *tag == name)
}

/// Elements below `root` in document order, `root` excluded.
pub(crate) fn descendants<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Every element of `document` whose tag is in `tags` (any tag when empty)
/// and whose class matches `pattern`, in document order.
pub(crate) fn containers<'a>(
    document: &'a Html,
    tags: &'a [&'a str],
    pattern: &'a Regex,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| tag_matches(el, tags) && has_class(el, pattern))
}

/// First descendant with a tag in `tags` and, if given, a class matching `pattern`.
pub(crate) fn find_tagged<'a>(
    root: ElementRef<'a>,
    tags: &[&str],
    pattern: Option<&Regex>,
) -> Option<ElementRef<'a>> {
    descendants(root)
        .find(|el| tag_matches(el, tags) && pattern.is_none_or(|p| has_class(el, p)))
}

/// Try each selector in turn; the first one with a match wins.
pub(crate) fn select_first<'a>(root: ElementRef<'a>, candidates: &[Selector]) -> Option<ElementRef<'a>> {
    candidates
        .iter()
        .find_map(|selector| root.select(selector).next())
}

/// `href` of the first link below `root`.
pub(crate) fn first_link<'a>(root: ElementRef<'a>) -> Option<&'a str> {
    root.select(&LINK).next().and_then(|a| a.value().attr("href"))
}

/// `datetime` of the first `<time>` below `root`, or empty.
pub(crate) fn published_of(root: ElementRef<'_>) -> String {
    root.select(&TIME)
        .next()
        .and_then(|t| t.value().attr("datetime"))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Fields located inside one container, before validation.
pub(crate) struct RawEntry<'a> {
    pub title: Option<ElementRef<'a>>,
    pub href: Option<&'a str>,
    pub description: Option<ElementRef<'a>>,
    pub published: String,
}

impl RawEntry<'_> {
    /// Validate and normalize into a candidate.
    ///
    /// `Ok(None)` when the title or link is absent; an error when either is blank.
    pub(crate) fn into_candidate(self, provider: &str, base: Option<&str>) -> Result<Option<ArticleCandidate>> {
        let (Some(title), Some(href)) = (self.title, self.href) else {
            return Ok(None);
        };
        let title = text_of(title);
        if title.is_empty() {
            return Err(SearchError::Parse {
                source_name: provider.to_string(),
                reason: "title element has no text".to_string(),
            });
        }
        let href = href.trim();
        if href.is_empty() {
            return Err(SearchError::Parse {
                source_name: provider.to_string(),
                reason: format!("empty link for '{title}'"),
            });
        }

        Ok(Some(ArticleCandidate::new(
            title,
            normalize_url(href, base),
            self.description.map(text_of).unwrap_or_default(),
            self.published,
        )))
    }
}

/// Build candidates container by container, logging and skipping bad ones.
pub(crate) fn collect_entries<'a, I, F>(provider: &str, base: Option<&str>, containers: I, locate: F) -> Vec<ArticleCandidate>
where
    I: Iterator<Item = ElementRef<'a>>,
    F: Fn(ElementRef<'a>) -> RawEntry<'a>,
{
    let mut articles = Vec::new();
    for container in containers {
        match locate(container).into_candidate(provider, base) {
            Ok(Some(article)) => articles.push(article),
            Ok(None) => {}
            Err(e) => debug!(provider, error = %e, "Skipping listing entry"),
        }
    }
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(normalize_url("//x.com/a", None), "https://x.com/a");
        assert_eq!(normalize_url("//x.com/a", Some("http://y.com")), "https://x.com/a");
    }

    #[test]
    fn test_normalize_root_relative() {
        assert_eq!(normalize_url("/a", Some("https://x.com")), "https://x.com/a");
        assert_eq!(normalize_url("/a?b=1", Some("https://x.com/deep/path?q=2")), "https://x.com/a?b=1");
        assert_eq!(normalize_url("/a", Some("http://127.0.0.1:8080/x")), "http://127.0.0.1:8080/a");
        assert_eq!(normalize_url("/a", None), "/a");
        assert_eq!(normalize_url("/a", Some("not a url")), "/a");
    }

    #[test]
    fn test_normalize_bare_and_absolute() {
        assert_eq!(normalize_url("x.com/a", None), "https://x.com/a");
        assert_eq!(normalize_url("https://x.com/a", None), "https://x.com/a");
        assert_eq!(normalize_url("http://x.com/a", Some("https://y.com")), "http://x.com/a");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["//x.com/a", "x.com/a", "https://x.com/a"] {
            let once = normalize_url(raw, None);
            assert_eq!(normalize_url(&once, None), once);
        }
        let once = normalize_url("/a", Some("https://x.com"));
        assert_eq!(normalize_url(&once, Some("https://x.com")), once);
    }

    #[test]
    fn test_detect_dispatch_order() {
        assert_eq!(
            ListingParser::detect("https://news.google.com/search?q=a"),
            ListingParser::GoogleNews
        );
        assert_eq!(ListingParser::detect("https://www.bing.com/news/search?q=a"), ListingParser::BingNews);
        assert_eq!(
            ListingParser::detect("https://news.search.yahoo.com/search?p=a"),
            ListingParser::YahooNews
        );
        assert_eq!(
            ListingParser::detect("https://www.reuters.com/search/news?blob=a"),
            ListingParser::Reuters
        );
        assert_eq!(ListingParser::detect("https://www.ft.com/search?q=a"), ListingParser::FinancialTimes);
        assert_eq!(ListingParser::detect("https://example.org/?q=a"), ListingParser::Generic);
    }

    #[test]
    fn test_query_text_can_shadow_provider_marker() {
        // known limitation: the query is part of the matched string
        assert_eq!(
            ListingParser::detect("https://www.reuters.com/search/news?blob=google+earnings"),
            ListingParser::GoogleNews
        );
        let source = ContentSource::new("Reuters", "https://www.reuters.com/search/news?blob={query}", "general");
        let html = r#"<div class="search-result-content"><h3><a href="/a">Google earnings</a></h3></div>"#;
        let articles = parse_listing(html, &source.search_url("google earnings"), &source);
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_listing_stamps_source() {
        let html = r#"<html><body>
            <article><h2>Apple stock rises</h2><a href="/story/1">read</a><p>Shares up</p></article>
        </body></html>"#;
        let source = ContentSource::new("Example", "https://example.org/?q={query}", "news");
        let articles = parse_listing(html, "https://example.org/?q=apple", &source);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "Example");
        assert_eq!(articles[0].category, "news");
        assert_eq!(articles[0].url, "https://example.org/story/1");
    }

    #[test]
    fn test_blank_title_is_skipped_not_fatal() {
        let html = r#"<html><body>
            <article><h2>   </h2><a href="/a">x</a></article>
            <article><h2>Second</h2><a href="/b">y</a></article>
        </body></html>"#;
        let source = ContentSource::new("Example", "https://example.org/?q={query}", "general");
        let articles = parse_listing(html, "https://example.org/", &source);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Second");
    }
}
