//! Writing search results to disk.
//!
//! # Submodules
//!
//! - [`json`]: the whole [`SearchResults`] envelope, pretty-printed
//! - [`csv`]: one row per article
//!
//! Files land in the chosen directory as `news_results_<unix-seconds>.<fmt>`.
//! [`export`] never fails: problems are logged and reported by leaving
//! `exported_file` unset.

pub mod csv;
pub mod json;

use crate::error::{Result, SearchError};
use crate::models::SearchResults;
use chrono::Utc;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, instrument, warn};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(SearchError::UnsupportedExportFormat(s.to_string())),
        }
    }
}

/// Timestamped export filename for `format`.
pub fn export_filename(format: ExportFormat) -> String {
    format!("news_results_{}.{}", Utc::now().timestamp(), format.extension())
}

/// Export `results` to `dir` and record the written path in
/// `results.exported_file`.
///
/// # Arguments
///
/// * `results` - Envelope to write; only `exported_file` is modified
/// * `format` - `json` or `csv`, case-insensitive
/// * `dir` - Existing directory the timestamped file is created in
///
/// # Returns
///
/// Nothing. Unsupported formats, a CSV export with no articles and write
/// failures are logged and leave `exported_file` as `None`; the articles are
/// never touched.
#[instrument(level = "info", skip(results, dir), fields(dir = %dir.as_ref().display()))]
pub async fn export(results: &mut SearchResults, format: &str, dir: impl AsRef<Path>) {
    results.exported_file = None;

    let format = match format.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(e) => {
            error!(error = %e, "Export skipped");
            return;
        }
    };

    let path = dir.as_ref().join(export_filename(format));
    let written = match format {
        ExportFormat::Json => self::json::write_results(results, &path).await.map(|()| true),
        ExportFormat::Csv => self::csv::write_articles(&results.data.articles, &path).await,
    };

    match written {
        Ok(true) => {
            let path = path.display().to_string();
            info!(%path, %format, "Results exported");
            results.exported_file = Some(path);
        }
        Ok(false) => warn!(%format, "Nothing to export"),
        Err(e) => error!(path = %path.display(), error = %e, "Failed to export results"),
    }
}
