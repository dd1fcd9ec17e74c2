//! Search orchestration: the two-batch pipeline behind [`NewsSearcher::search`].
//!
//! 1. Resolve the category (unknown falls back to `general`)
//! 2. Batch 1: fetch and parse one listing page per source
//! 3. Merge, deduplicate and rank with [`filter_results`]
//! 4. Stop early when nothing is relevant
//! 5. Batch 2: fetch and extract every surviving article
//!
//! The returned list is in batch-2 completion order, not relevance order.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::extract::ContentExtractor;
use crate::fetch::Fetcher;
use crate::models::{ArticleCandidate, ContentSource};
use crate::pool::{BatchOptions, run_batch};
use crate::relevance::filter_results;
use crate::scrapers::parse_listing;
use crate::sources::SourceRegistry;
use tracing::{debug, info, instrument};

/// Entry point of the scraping pipeline. Holds no per-search state.
#[derive(Debug, Clone)]
pub struct NewsSearcher {
    registry: SourceRegistry,
    fetcher: Fetcher,
    extractor: ContentExtractor,
    batch: BatchOptions,
}

impl NewsSearcher {
    /// Validate `config` and build a searcher.
    ///
    /// # Errors
    ///
    /// [`crate::SearchError::InvalidConfig`] for unusable settings, or an
    /// HTTP error if the client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let registry = match &config.sources {
            Some(sources) => SourceRegistry::from_map(sources.clone()),
            None => SourceRegistry::builtin(),
        };
        Ok(Self {
            registry,
            fetcher: Fetcher::new(&config)?,
            extractor: ContentExtractor::new(&config),
            batch: BatchOptions::new(&config),
        })
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Search every source of `category` for `query`.
    ///
    /// Never fails: unreachable sources, unparsable pages and empty articles
    /// are logged and left out.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, query: &str, category: &str) -> Vec<ArticleCandidate> {
        info!("Starting search");
        let (category, sources) = self.registry.resolve(category);

        let listings = run_batch(
            "sources",
            sources.iter().collect::<Vec<_>>(),
            self.batch,
            |source| format!("{} {}", source.name, source.search_url(query)),
            |source| self.fetch_source(source, query),
        )
        .await;
        let candidates: Vec<ArticleCandidate> = listings.into_iter().flatten().collect();
        info!(category, count = candidates.len(), "Collected listing candidates");

        let filtered = filter_results(candidates, query);
        info!(count = filtered.len(), "Relevant candidates after filtering");
        if filtered.is_empty() {
            info!("No articles to extract content from");
            return Vec::new();
        }

        let articles = run_batch(
            "articles",
            filtered,
            self.batch,
            |candidate| format!("{} [{}] {}", candidate.url, candidate.source, candidate.title),
            |candidate| self.fetch_article(candidate),
        )
        .await;
        info!(count = articles.len(), "Articles enriched with full content");
        articles
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn fetch_source(&self, source: &ContentSource, query: &str) -> Result<Vec<ArticleCandidate>> {
        let url = source.search_url(query);
        debug!(%url, "Fetching listing page");
        let html = self.fetcher.fetch(&url, &source.name).await?;
        let articles = parse_listing(&html, &url, source);
        info!(count = articles.len(), "Found articles");
        Ok(articles)
    }

    #[instrument(level = "info", skip_all, fields(url = %candidate.url, title = %candidate.title))]
    async fn fetch_article(&self, candidate: ArticleCandidate) -> Result<ArticleCandidate> {
        let html = self.fetcher.fetch(&candidate.url, &candidate.source).await?;
        let content = self.extractor.extract(&html, &candidate.url)?;
        debug!(text_length = content.text_length, images = content.images.len(), "Extracted content");
        Ok(content.apply(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::BTreeMap;

    fn article_page(paragraph: &str) -> String {
        format!(
            "<html><body><nav>menu</nav><article><p>{paragraph}</p>\
             <img src=\"/img/a.png\"></article></body></html>"
        )
    }

    fn long(text: &str) -> String {
        format!("{text} {}", "lorem ipsum ".repeat(8))
    }

    fn config_for(sources: Vec<ContentSource>) -> SearchConfig {
        let mut map = BTreeMap::new();
        map.insert("general".to_string(), sources.clone());
        let news = sources
            .into_iter()
            .take(1)
            .map(|mut s| {
                s.category = "news".to_string();
                s
            })
            .collect();
        map.insert("news".to_string(), news);
        SearchConfig {
            max_retries: 1,
            backoff_base_ms: 1,
            timeout_secs: 5,
            sources: Some(map),
            ..Default::default()
        }
    }

    /// A listing page in the generic layout linking to two articles on `server`.
    fn listing(server: &MockServer, prefix: &str) -> String {
        format!(
            r#"<html><body>
                <article><h2>Apple stock rises</h2><a href="{a}">a</a></article>
                <article><h2>Weather report</h2><a href="{b}">b</a></article>
            </body></html>"#,
            a = server.url(format!("/{prefix}/apple")),
            b = server.url(format!("/{prefix}/weather")),
        )
    }

    #[tokio::test]
    async fn test_partial_failure_still_returns_other_sources() {
        let server = MockServer::start_async().await;
        for prefix in ["one", "two"] {
            let body = listing(&server, prefix);
            server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/{prefix}/search"));
                    then.status(200).body(body);
                })
                .await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/{prefix}/apple"));
                    then.status(200).body(article_page(&long(prefix)));
                })
                .await;
        }
        let broken = server
            .mock_async(|when, then| {
                when.method(GET).path("/three/search");
                then.status(500);
            })
            .await;

        let sources = ["one", "two", "three"]
            .iter()
            .map(|p| {
                ContentSource::new(
                    p,
                    &format!("{}?q={{query}}", server.url(format!("/{p}/search"))),
                    "general",
                )
            })
            .collect();
        let searcher = NewsSearcher::new(config_for(sources)).unwrap();
        let results = searcher.search("apple", "general").await;

        // initial attempt plus one retry
        assert_eq!(broken.hits_async().await, 2);
        assert_eq!(results.len(), 2);
        let mut sources: Vec<&str> = results.iter().map(|a| a.source.as_str()).collect();
        sources.sort();
        assert_eq!(sources, vec!["one", "two"]);
        for article in &results {
            assert_eq!(article.relevance_score, Some(2));
            assert!(article.full_text.as_deref().unwrap().starts_with(&article.source));
            assert_eq!(article.images, vec![server.url("/img/a.png")]);
            assert!(article.text_length.unwrap() > 50);
        }
    }

    #[tokio::test]
    async fn test_empty_filter_skips_extraction() {
        let server = MockServer::start_async().await;
        let body = listing(&server, "one");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/search");
                then.status(200).body(body);
            })
            .await;
        let mut article_mocks = Vec::new();
        for path in ["/one/apple", "/one/weather"] {
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET).path(path);
                    then.status(200).body(article_page(&long("x")));
                })
                .await;
            article_mocks.push(mock);
        }

        let source = ContentSource::new(
            "one",
            &format!("{}?q={{query}}", server.url("/one/search")),
            "general",
        );
        let searcher = NewsSearcher::new(config_for(vec![source])).unwrap();
        let results = searcher.search("zebra", "general").await;

        assert!(results.is_empty());
        for mock in &article_mocks {
            assert_eq!(mock.hits_async().await, 0);
        }
    }

    #[tokio::test]
    async fn test_unknown_category_matches_general() {
        let server = MockServer::start_async().await;
        let body = listing(&server, "one");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/search");
                then.status(200).body(body);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/apple");
                then.status(200).body(article_page(&long("apple")));
            })
            .await;

        let source = ContentSource::new(
            "one",
            &format!("{}?q={{query}}", server.url("/one/search")),
            "general",
        );
        let searcher = NewsSearcher::new(config_for(vec![source])).unwrap();
        let general = searcher.search("apple stock", "general").await;
        let bogus = searcher.search("apple stock", "bogus").await;

        assert_eq!(general.len(), 1);
        assert_eq!(general, bogus);
        assert_eq!(general[0].relevance_score, Some(4));
        assert_eq!(general[0].category, "general");
    }

    #[tokio::test]
    async fn test_article_without_content_is_dropped() {
        let server = MockServer::start_async().await;
        let body = format!(
            r#"<article><h2>Apple one</h2><a href="{}">a</a></article>
               <article><h2>Apple two</h2><a href="{}">b</a></article>"#,
            server.url("/one/full"),
            server.url("/one/thin"),
        );
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/search");
                then.status(200).body(body);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/full");
                then.status(200).body(article_page(&long("apple")));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/one/thin");
                then.status(200).body("<article><p>too short</p></article>");
            })
            .await;

        let source = ContentSource::new(
            "one",
            &format!("{}?q={{query}}", server.url("/one/search")),
            "general",
        );
        let searcher = NewsSearcher::new(config_for(vec![source])).unwrap();
        let results = searcher.search("apple", "general").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Apple one");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SearchConfig {
            pool_size: 0,
            ..Default::default()
        };
        assert!(NewsSearcher::new(config).is_err());
    }

    #[test]
    fn test_builtin_registry_by_default() {
        let searcher = NewsSearcher::new(SearchConfig::default()).unwrap();
        let (_, sources) = searcher.registry().resolve("news");
        assert_eq!(sources.len(), 3);
    }
}
