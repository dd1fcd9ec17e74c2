//! LLM reply generation.
//!
//! The pipeline itself never calls a language model; this module is the
//! collaborator the binary uses to turn search results into a short written
//! reply. Two implementations share the [`Responder`] trait:
//!
//! - [`DummyResponder`]: deterministic echo for tests and offline runs
//! - [`OpenAiResponder`]: a single-message call to an OpenAI-compatible
//!   `/v1/chat/completions` endpoint
//!
//! Failures are returned as [`SearchError::Responder`] and are not retried.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.2;

/// Given text, return text.
pub trait Responder {
    async fn respond(&self, input: &str) -> Result<String>;
}

/// Echoes its input back in a fixed frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyResponder;

impl Responder for DummyResponder {
    async fn respond(&self, input: &str) -> Result<String> {
        Ok(format!("Dummy response to: {input}"))
    }
}

/// Client for an OpenAI-compatible chat completions API.
pub struct OpenAiResponder {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for OpenAiResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiResponder")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiResponder {
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] when `api_key` is empty.
    pub fn new(api_key: &str, base_url: Option<&str>, model: Option<&str>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SearchError::InvalidConfig("an OpenAI API key is required".into()));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or(DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or(DEFAULT_OPENAI_MODEL).to_string(),
        })
    }
}

impl Responder for OpenAiResponder {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn respond(&self, input: &str) -> Result<String> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: input,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Responder(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis(), "Chat completion rejected");
            return Err(SearchError::Responder(format!("provider returned {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Responder(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SearchError::Responder("response contained no choices".into()))?;

        info!(elapsed_ms = t0.elapsed().as_millis(), chars = content.len(), "Chat completion received");
        Ok(content)
    }
}

/// Responder picked at runtime by the CLI.
#[derive(Debug)]
pub enum LlmProvider {
    Dummy(DummyResponder),
    OpenAi(OpenAiResponder),
}

impl Responder for LlmProvider {
    async fn respond(&self, input: &str) -> Result<String> {
        match self {
            LlmProvider::Dummy(r) => r.respond(input).await,
            LlmProvider::OpenAi(r) => r.respond(input).await,
        }
    }
}
