//! Full-text and image extraction from an article's own page.
//!
//! The page is stripped of `script`, `style`, `nav`, `header`, `footer` and
//! `aside` elements, then the first element matching one of these selectors is
//! taken as the content container:
//!
//! `article`, `main`, `.article-body`, `.story-content`, `#article-body`, `.post-content`
//!
//! Inside it, paragraphs longer than the minimum length become `full_text`
//! and the first few `<img src>` values become `images`.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::models::ArticleCandidate;
use crate::scrapers::{normalize_url, selectors};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static STRIPPED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style, nav, header, footer, aside").expect("valid selector")
});
static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    selectors(&[
        "article",
        "main",
        ".article-body",
        ".story-content",
        "#article-body",
        ".post-content",
    ])
});
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").expect("valid selector"));

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Body text and images pulled from one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub full_text: String,
    pub text_length: usize,
    pub images: Vec<String>,
}

impl ExtractedContent {
    /// Attach the extracted fields to `candidate`.
    pub fn apply(self, mut candidate: ArticleCandidate) -> ArticleCandidate {
        candidate.full_text = Some(self.full_text);
        candidate.text_length = Some(self.text_length);
        candidate.images = self.images;
        candidate
    }
}

/// Content-extraction heuristics.
#[derive(Debug, Clone, Copy)]
pub struct ContentExtractor {
    min_paragraph_chars: usize,
    max_images: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl ContentExtractor {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            min_paragraph_chars: config.min_paragraph_chars,
            max_images: config.max_images,
        }
    }

    /// Extract content from `html`, fetched from `article_url`.
    ///
    /// Relative image sources resolve against `article_url`.
    ///
    /// # Errors
    ///
    /// [`SearchError::ExtractionEmpty`] when no container matches or no
    /// paragraph is long enough.
    pub fn extract(&self, html: &str, article_url: &str) -> Result<ExtractedContent> {
        let mut document = Html::parse_document(html);
        strip_non_content(&mut document);

        // `Html::select` still visits detached nodes; walking from the root does not.
        let root = document.root_element();
        let Some(container) = CONTENT.iter().find_map(|selector| root.select(selector).next()) else {
            return Err(SearchError::ExtractionEmpty {
                url: article_url.to_string(),
                reason: "main content not found".to_string(),
            });
        };

        let paragraphs: Vec<String> = container
            .select(&PARAGRAPH)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|text| text.chars().count() > self.min_paragraph_chars)
            .collect();

        if paragraphs.is_empty() {
            return Err(SearchError::ExtractionEmpty {
                url: article_url.to_string(),
                reason: "no substantial paragraphs".to_string(),
            });
        }

        let images = container
            .select(&IMAGE)
            .filter_map(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(|src| normalize_url(src, Some(article_url)))
            .take(self.max_images)
            .collect();

        Ok(ExtractedContent {
            text_length: paragraphs.iter().map(|p| p.chars().count()).sum(),
            full_text: paragraphs.join(PARAGRAPH_SEPARATOR),
            images,
        })
    }
}

fn strip_non_content(document: &mut Html) {
    let ids: Vec<_> = document.select(&STRIPPED).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
