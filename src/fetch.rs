//! HTTP fetching with User-Agent rotation and exponential backoff.
//!
//! Every request carries a browser-like header set and a User-Agent picked
//! uniformly at random from the configured pool. Failed attempts (transport
//! errors and non-2xx statuses alike) are retried up to `max_retries` times.
//!
//! # Backoff Strategy
//!
//! ```text
//! delay(retry_count) = backoff_base * 2^retry_count     (retry_count = 0, 1, 2, ...)
//! ```
//!
//! With the defaults (base 1s, 3 retries) a dead URL costs 1 + 3 attempts and
//! 1s + 2s + 4s of sleeping. The sleep only suspends the task that owns the
//! fetch; other tasks in the same batch keep running.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use rand::{rng, seq::IndexedRandom};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

const MAX_REDIRECTS: usize = 10;

/// Shared HTTP client for both pipeline stages.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agents: Vec<String>,
    max_retries: u32,
    backoff_base: Duration,
}

impl Fetcher {
    /// Build a fetcher from validated configuration.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        if config.user_agents.is_empty() {
            return Err(SearchError::InvalidConfig("user_agents must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .default_headers(browser_headers())
            .build()?;

        Ok(Self {
            client,
            user_agents: config.user_agents.clone(),
            max_retries: config.max_retries,
            backoff_base: config.backoff_base(),
        })
    }

    fn random_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rng())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Delay before retry number `retry_count` (counting from 0).
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        self.backoff_base.saturating_mul(1u32 << retry_count.min(16))
    }

    /// GET `url` and return its body, retrying on failure.
    ///
    /// Each attempt picks a fresh User-Agent. A transport error or non-2xx
    /// status sleeps `backoff_delay(n)` and tries again, so a URL gets at most
    /// `1 + max_retries` attempts.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to request
    /// * `source_name` - Owning source, used only for log and error context
    ///
    /// # Returns
    ///
    /// The response body decoded as text.
    ///
    /// # Errors
    ///
    /// [`SearchError::Fetch`] carrying the URL, the source name and the last
    /// failure once `max_retries` retries have been used up.
    #[instrument(level = "info", skip_all, fields(url = %url, source = %source_name))]
    pub async fn fetch(&self, url: &str, source_name: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut retry_count = 0u32;

        loop {
            match self.attempt(url).await {
                Ok(body) => {
                    debug!(
                        bytes = body.len(),
                        elapsed_ms = total_t0.elapsed().as_millis(),
                        "Fetched URL"
                    );
                    return Ok(body);
                }
                Err(e) => {
                    if retry_count >= self.max_retries {
                        error!(
                            retries = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "Request failed after exhausting retries"
                        );
                        return Err(SearchError::Fetch {
                            url: url.to_string(),
                            source_name: source_name.to_string(),
                            reason: e.to_string(),
                        });
                    }

                    let delay = self.backoff_delay(retry_count);
                    retry_count += 1;
                    warn!(
                        attempt = retry_count,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "Request failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let user_agent = self.random_user_agent().to_string();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers
}
