//! JSON export of the full results envelope.

use crate::error::Result;
use crate::models::SearchResults;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `results` as pretty-printed JSON to `path`.
///
/// The parent directory must already exist.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_results(results: &SearchResults, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json).await?;
    info!(articles = results.data.article_count, "Wrote JSON export");
    Ok(())
}
