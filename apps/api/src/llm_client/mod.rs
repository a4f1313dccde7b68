//! LLM Client: the single point of entry for all text-generation calls in the review API.
//!
//! ARCHITECTURAL RULE: No other module may call the chat-completions API directly.
//! Callers depend on the `TextGenerator` trait; `LlmClient` is the production implementation.
//!
//! Model: gpt-4o-mini (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[cfg(test)]
pub mod fake;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// The model used for every review.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini";
/// Low temperature biases the model toward the requested line format.
pub const TEMPERATURE: f32 = 0.3;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("LLM returned no choices")]
    EmptyChoices,

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Connection failures, 429 and 5xx are worth another attempt; everything else is final.
    fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Anything that can turn a prompt into a reply.
///
/// The review pipeline holds an `Arc<dyn TextGenerator>` so the transport can be swapped
/// (or faked in tests) without touching the extractor.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the message content of the first choice.
    pub fn text(&self) -> Result<&str, LlmError> {
        let choice = self.choices.first().ok_or(LlmError::EmptyChoices)?;
        match choice.message.content.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::EmptyContent),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by the review pipeline.
/// Wraps the chat-completions API with a per-attempt timeout and optional bounded retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            endpoint: chat_completions_url(DEFAULT_API_BASE),
            timeout: DEFAULT_TIMEOUT,
            max_retries: 0,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Ok(Self::new(config.openai_api_key.clone())?
            .with_api_base(&config.llm_api_base)
            .with_timeout(config.llm_timeout)
            .with_max_retries(config.llm_max_retries)
            .with_retry_base_delay(config.llm_retry_base_delay))
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.endpoint = chat_completions_url(api_base);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Makes a raw call to the chat-completions API, returning the full response object.
    /// Retries transient failures up to `max_retries` times with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let mut attempt: u32 = 0;

        loop {
            match self.attempt(&request_body).await {
                Ok(response) => {
                    if let Some(usage) = &response.usage {
                        debug!(
                            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    return Ok(response);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    // Exponential backoff: base, 2*base, 4*base, ...
                    let delay = self
                        .retry_base_delay
                        .saturating_mul(1u32 << attempt.min(16));
                    attempt += 1;
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One bounded attempt. Dropping the send future on expiry aborts the in-flight request.
    async fn attempt(&self, request_body: &ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
        tokio::time::timeout(self.timeout, self.send(request_body))
            .await
            .map_err(|_| LlmError::Timeout {
                after: self.timeout,
            })?
    }

    async fn send(&self, request_body: &ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response.text().map(str::to_string)
    }
}

fn chat_completions_url(api_base: &str) -> String {
    format!("{}{CHAT_COMPLETIONS_PATH}", api_base.trim_end_matches('/'))
}
