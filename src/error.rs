//! Error types for the search pipeline.
//!
//! Almost every variant here is non-fatal: the batch orchestrator logs it and
//! moves on. Only [`SearchError::InvalidConfig`] is meant to reach the caller
//! of [`crate::search::NewsSearcher::new`].

use thiserror::Error;

/// Errors produced while fetching, parsing, extracting or exporting.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure, timeout or non-2xx status after all retries.
    #[error("failed to fetch {url} for {source_name}: {reason}")]
    Fetch {
        url: String,
        source_name: String,
        reason: String,
    },

    /// Raw HTTP client error (client construction, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A single listing container or article had unusable structure.
    #[error("could not parse {source_name} entry: {reason}")]
    Parse { source_name: String, reason: String },

    /// No content container, or no paragraph survived the length filter.
    #[error("no extractable content at {url}: {reason}")]
    ExtractionEmpty { url: String, reason: String },

    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The LLM responder collaborator failed.
    #[error("responder failed: {0}")]
    Responder(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SearchError {
    /// `true` for outcomes that mean "nothing to return" rather than a failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, SearchError::ExtractionEmpty { .. })
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
