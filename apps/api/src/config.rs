use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_BASE;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub llm_api_base: String,
    /// Upper bound on a single generation attempt.
    pub llm_timeout: Duration,
    /// Extra attempts on transient upstream failures. 0 = one request per review.
    pub llm_max_retries: u32,
    /// First backoff delay; doubles on each further retry.
    pub llm_retry_base_delay: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs: u64 = parse_or("LLM_TIMEOUT_SECS", optional_env("LLM_TIMEOUT_SECS"), 60)?;
        if timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            llm_api_base: optional_env("LLM_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            llm_timeout: Duration::from_secs(timeout_secs),
            llm_max_retries: parse_or("LLM_MAX_RETRIES", optional_env("LLM_MAX_RETRIES"), 0)?,
            llm_retry_base_delay: Duration::from_millis(parse_or(
                "LLM_RETRY_BASE_MS",
                optional_env("LLM_RETRY_BASE_MS"),
                1000,
            )?),
            port: parse_or("PORT", optional_env("PORT"), 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
        None => Ok(default),
    }
}
