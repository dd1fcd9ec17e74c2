//! Runtime configuration for the search pipeline.
//!
//! Every field has a default, so an empty YAML file (or no file at all) yields
//! the stock behaviour: 3 retries, a 10 second timeout, 5 workers per batch.

use crate::error::{Result, SearchError};
use crate::models::{ContentSource, QUERY_PLACEHOLDER};
use crate::sources::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
];

/// Tunables for fetching, extraction and batch concurrency.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Backoff unit in milliseconds; retry `n` sleeps `2^n` units.
    pub backoff_base_ms: u64,
    /// Concurrent tasks per batch.
    pub pool_size: usize,
    /// Paragraphs must be strictly longer than this to be kept.
    pub min_paragraph_chars: usize,
    pub max_images: usize,
    /// Optional wall-clock limit per batch.
    pub batch_deadline_secs: Option<u64>,
    pub user_agents: Vec<String>,
    /// Replaces the built-in source registry when present.
    pub sources: Option<BTreeMap<String, Vec<ContentSource>>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_secs: 10,
            backoff_base_ms: 1000,
            pool_size: 5,
            min_paragraph_chars: 50,
            max_images: 5,
            batch_deadline_secs: None,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            sources: None,
        }
    }
}

impl SearchConfig {
    /// Load and validate a YAML configuration file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        info!(
            pool_size = config.pool_size,
            max_retries = config.max_retries,
            "Loaded search configuration"
        );
        Ok(config)
    }

    /// Reject settings that would make the pipeline unusable.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(SearchError::InvalidConfig("pool_size must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(SearchError::InvalidConfig("timeout_secs must be at least 1".into()));
        }
        if self.user_agents.is_empty() {
            return Err(SearchError::InvalidConfig("user_agents must not be empty".into()));
        }
        if let Some(sources) = &self.sources {
            if !sources.contains_key(DEFAULT_CATEGORY) {
                return Err(SearchError::InvalidConfig(format!(
                    "sources must define the '{DEFAULT_CATEGORY}' category"
                )));
            }
            for source in sources.values().flatten() {
                if !source.url_template.contains(QUERY_PLACEHOLDER) {
                    return Err(SearchError::InvalidConfig(format!(
                        "source '{}' has no {QUERY_PLACEHOLDER} placeholder",
                        source.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_secs.map(Duration::from_secs)
    }
}
