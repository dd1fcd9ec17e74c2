//! Catalog of search providers, grouped by category.
//!
//! | Category | Sources |
//! |----------|---------|
//! | `news` | Google News, Bing News, Yahoo News |
//! | `general` | Google News, Bing News, Yahoo News, Reuters, Financial Times |

use crate::models::ContentSource;
use std::collections::BTreeMap;
use tracing::warn;

/// Category used when the requested one is unknown.
pub const DEFAULT_CATEGORY: &str = "general";

const GOOGLE_NEWS: (&str, &str) = (
    "Google News",
    "https://news.google.com/search?q={query}&hl=en-US&gl=US&ceid=US:en",
);
const BING_NEWS: (&str, &str) = ("Bing News", "https://www.bing.com/news/search?q={query}");
const YAHOO_NEWS: (&str, &str) = ("Yahoo News", "https://news.search.yahoo.com/search?p={query}");
const REUTERS: (&str, &str) = ("Reuters", "https://www.reuters.com/search/news?blob={query}");
const FINANCIAL_TIMES: (&str, &str) = ("Financial Times", "https://www.ft.com/search?q={query}");

/// Immutable map from category name to its ordered source list.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    categories: BTreeMap<String, Vec<ContentSource>>,
}

impl SourceRegistry {
    /// The stock registry with the `news` and `general` categories.
    pub fn builtin() -> Self {
        fn build(category: &str, entries: &[(&str, &str)]) -> Vec<ContentSource> {
            entries
                .iter()
                .map(|(name, template)| ContentSource::new(name, template, category))
                .collect()
        }

        let mut categories = BTreeMap::new();
        categories.insert(
            "news".to_string(),
            build("news", &[GOOGLE_NEWS, BING_NEWS, YAHOO_NEWS]),
        );
        categories.insert(
            DEFAULT_CATEGORY.to_string(),
            build(
                DEFAULT_CATEGORY,
                &[GOOGLE_NEWS, BING_NEWS, YAHOO_NEWS, REUTERS, FINANCIAL_TIMES],
            ),
        );
        Self { categories }
    }

    /// Registry from an explicit table; callers validate it beforehand.
    pub fn from_map(categories: BTreeMap<String, Vec<ContentSource>>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Sources for `category`, falling back to [`DEFAULT_CATEGORY`] with a warning.
    ///
    /// Returns the category actually used together with its sources.
    pub fn resolve<'a>(&'a self, category: &'a str) -> (&'a str, &'a [ContentSource]) {
        if let Some(sources) = self.categories.get(category) {
            return (category, sources);
        }
        warn!(category, fallback = DEFAULT_CATEGORY, "Unknown category; using default");
        let sources = self
            .categories
            .get(DEFAULT_CATEGORY)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        (DEFAULT_CATEGORY, sources)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories() {
        let registry = SourceRegistry::builtin();
        let cats: Vec<&str> = registry.categories().collect();
        assert_eq!(cats, vec!["general", "news"]);

        let (_, news) = registry.resolve("news");
        assert_eq!(news.len(), 3);
        assert!(news.iter().all(|s| s.category == "news"));

        let (_, general) = registry.resolve("general");
        let names: Vec<&str> = general.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Google News", "Bing News", "Yahoo News", "Reuters", "Financial Times"]
        );
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let registry = SourceRegistry::builtin();
        let (used, sources) = registry.resolve("bogus");
        let (_, general) = registry.resolve("general");
        assert_eq!(used, "general");
        assert_eq!(sources, general);
    }

    #[test]
    fn test_every_template_has_placeholder() {
        let registry = SourceRegistry::builtin();
        for cat in ["news", "general"] {
            let (_, sources) = registry.resolve(cat);
            assert!(sources.iter().all(|s| s.url_template.contains("{query}")));
            assert!(sources.iter().all(|s| s.language == "en"));
        }
    }
}
