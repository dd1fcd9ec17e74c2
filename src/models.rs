//! Data models shared by every stage of the pipeline.
//!
//! - [`ContentSource`]: a configured search provider
//! - [`ArticleCandidate`]: an article stub, later scored and enriched
//! - [`SearchResults`]: the envelope handed to callers and exporters

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the percent-encoded query in a URL template.
pub const QUERY_PLACEHOLDER: &str = "{query}";

fn default_language() -> String {
    "en".to_string()
}

/// An immutable description of one search provider.
///
/// # Fields
///
/// * `name` - Display name, stamped onto every candidate it yields
/// * `url_template` - Search URL containing one `{query}` placeholder
/// * `kind` - Source type tag (serialized as `type`), e.g. `"search"`
/// * `category` - Category this source is grouped under
/// * `language` - Language tag, `"en"` unless configured otherwise
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentSource {
    pub name: String,
    pub url_template: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl ContentSource {
    pub fn new(name: &str, url_template: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            kind: "search".to_string(),
            category: category.to_string(),
            language: default_language(),
        }
    }

    /// Build the search URL for `query`, percent-encoding it first.
    pub fn search_url(&self, query: &str) -> String {
        self.url_template
            .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query))
    }
}

/// An article discovered on a listing page.
///
/// Parsing fills the first six fields. The relevance filter sets
/// `relevance_score`; extraction sets `full_text`, `text_length` and
/// `images`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleCandidate {
    pub title: String,
    /// Absolute URL after normalization.
    pub url: String,
    pub description: String,
    /// Publication timestamp as found on the page, or empty.
    pub published: String,
    pub source: String,
    pub category: String,
    pub relevance_score: Option<u32>,
    /// Retained paragraphs joined by a blank line.
    pub full_text: Option<String>,
    /// Sum of retained paragraph lengths in characters, separators excluded.
    pub text_length: Option<usize>,
    /// At most five absolute image URLs in document order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ArticleCandidate {
    pub fn new(title: String, url: String, description: String, published: String) -> Self {
        Self {
            title,
            url,
            description,
            published,
            ..Default::default()
        }
    }
}

/// Result payload for one search, mirrored by the JSON export.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResults {
    pub status: String,
    pub message: String,
    pub data: SearchData,
    pub exported_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchData {
    pub articles: Vec<ArticleCandidate>,
    pub article_count: usize,
    pub query: String,
}

impl SearchResults {
    pub fn new(query: &str, articles: Vec<ArticleCandidate>) -> Self {
        let message = if articles.is_empty() {
            "No articles found"
        } else {
            "Articles retrieved successfully"
        };
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: SearchData {
                article_count: articles.len(),
                articles,
                query: query.to_string(),
            },
            exported_file: None,
        }
    }
}
