//! Small helpers for presentation, logging and the file system.

use crate::error::Result;
use crate::models::ArticleCandidate;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N bytes)"` appended,
/// where `N` is the number of bytes dropped.
///
/// ```
/// use noovox_search::utils::truncate_for_log;
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Render a multi-line, human-readable summary of one article.
///
/// Title, source with category and URL are always present; published date,
/// content length, a text preview of at most `max_len` characters and the
/// image count only when the article carries them.
pub fn format_article_preview(article: &ArticleCandidate, max_len: usize) -> String {
    let mut lines = vec![
        format!("Title: {}", article.title),
        format!("Source: {} ({})", article.source, article.category),
    ];

    if !article.published.is_empty() {
        lines.push(format!("Published: {}", article.published));
    }
    if let Some(length) = article.text_length.filter(|n| *n > 0) {
        lines.push(format!("Content Length: {length} characters"));
    }
    if let Some(text) = article.full_text.as_deref().filter(|t| !t.is_empty()) {
        let mut preview: String = text.chars().take(max_len).collect();
        if text.chars().count() > max_len {
            preview.push_str("...");
        }
        lines.push(format!("Preview: {preview}"));
    }

    lines.push(format!("URL: {}", article.url));

    if !article.images.is_empty() {
        lines.push(format!("Images: {} found", article.images.len()));
    }

    lines.join("\n")
}

/// Render the full-text view of one article: title, body and image URLs.
///
/// # Arguments
///
/// * `article` - An enriched article
///
/// # Returns
///
/// The title, the full text between two rules (or a placeholder when the
/// article was never extracted) and, when present, one image URL per line.
pub fn format_full_article(article: &ArticleCandidate) -> String {
    let rule = "=".repeat(60);
    let body = article
        .full_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("No content available.");
    let mut out = format!("{}\n{rule}\n{body}\n{rule}", article.title);
    if !article.images.is_empty() {
        out.push_str("\n\nImage URLs:");
        for image in &article.images {
            out.push('\n');
            out.push_str(image);
        }
    }
    out
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let scratch = format!("{}/.__write_check__", path.trim_end_matches('/'));
    stdfs::File::create(&scratch)?;
    let _ = stdfs::remove_file(&scratch);
    info!("Output directory is writable");
    Ok(())
}
