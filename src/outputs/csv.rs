//! CSV export, one row per article.
//!
//! Columns follow the article record. `images` is a single cell with the
//! URLs joined by `;`; absent optional fields are empty cells.

use crate::error::{Result, SearchError};
use crate::models::ArticleCandidate;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const IMAGE_SEPARATOR: &str = ";";

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
    published: &'a str,
    source: &'a str,
    category: &'a str,
    relevance_score: Option<u32>,
    full_text: Option<&'a str>,
    text_length: Option<usize>,
    images: String,
}

impl<'a> From<&'a ArticleCandidate> for CsvRow<'a> {
    fn from(article: &'a ArticleCandidate) -> Self {
        Self {
            title: &article.title,
            url: &article.url,
            description: &article.description,
            published: &article.published,
            source: &article.source,
            category: &article.category,
            relevance_score: article.relevance_score,
            full_text: article.full_text.as_deref(),
            text_length: article.text_length,
            images: article.images.join(IMAGE_SEPARATOR),
        }
    }
}

/// Encode `articles` as CSV with a header row.
pub fn to_csv(articles: &[ArticleCandidate]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for article in articles {
        writer.serialize(CsvRow::from(article))?;
    }
    writer
        .into_inner()
        .map_err(|e| SearchError::Io(e.into_error()))
}

/// Write `articles` to `path`. Returns `false`, writing nothing, when there
/// are no articles.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[ArticleCandidate], path: &Path) -> Result<bool> {
    if articles.is_empty() {
        return Ok(false);
    }
    let bytes = to_csv(articles)?;
    fs::write(path, bytes).await?;
    info!("Wrote CSV export");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_row() {
        let article = ArticleCandidate {
            title: "Apple, Inc. rises".to_string(),
            url: "https://x.com/a".to_string(),
            source: "bing_news".to_string(),
            category: "news".to_string(),
            relevance_score: Some(3),
            images: vec!["https://x.com/1.png".to_string(), "https://x.com/2.png".to_string()],
            ..Default::default()
        };
        let text = String::from_utf8(to_csv(&[article]).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "title,url,description,published,source,category,relevance_score,full_text,text_length,images"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Apple, Inc. rises\",https://x.com/a,,,bing_news,news,3,,,https://x.com/1.png;https://x.com/2.png"
        );
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn test_empty_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert!(!write_articles(&[], &path).await.unwrap());
        assert!(!path.exists());
    }
}
