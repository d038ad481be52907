//! Anthropic Messages API backend for the model classifier.
//!
//! Configuration comes from the environment:
//! - `ANTHROPIC_API_KEY` (required)
//! - `ANTHROPIC_MODEL` (optional; default `claude-3-haiku-20240307`)
//! - `ANTHROPIC_BASE_URL` (optional; default `https://api.anthropic.com`)
//! - `ANTHROPIC_VERSION` (optional; default `2023-06-01`)

use std::time::Duration;

use anyhow::{anyhow, Result};
use ontoslice_classify::{ClassifyError, CompletionBackend};
use serde_json::{json, Value};

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_MODEL_ENV: &str = "ANTHROPIC_MODEL";
pub const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
pub const ANTHROPIC_VERSION_ENV: &str = "ANTHROPIC_VERSION";

const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 500;
const TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    base_url: String,
    api_key: String,
    model: String,
    version: String,
}

impl AnthropicBackend {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ANTHROPIC_API_KEY_ENV).unwrap_or_default();
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(anyhow!(
                "model classification requires {ANTHROPIC_API_KEY_ENV} in the environment"
            ));
        }
        let env_or = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Ok(Self {
            base_url: normalize_base_url(&env_or(
                ANTHROPIC_BASE_URL_ENV,
                DEFAULT_ANTHROPIC_BASE_URL,
            )),
            api_key,
            model: env_or(ANTHROPIC_MODEL_ENV, DEFAULT_ANTHROPIC_MODEL),
            version: env_or(ANTHROPIC_VERSION_ENV, DEFAULT_ANTHROPIC_VERSION),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": 0,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        let resp = client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .json(&body)
            .send()
            .map_err(|e| anyhow!("failed to reach Anthropic at {url}: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!("anthropic http error {status}: {text}"));
        }
        let v: Value = resp
            .json()
            .map_err(|e| anyhow!("anthropic returned invalid JSON: {e}"))?;
        response_text(&v).ok_or_else(|| anyhow!("anthropic: no text blocks in response"))
    }
}

impl CompletionBackend for AnthropicBackend {
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        tracing::debug!(model = %self.model, chars = prompt.len(), "anthropic request");
        self.request(prompt)
            .map_err(|e| ClassifyError::Backend(e.to_string()))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("https://{url}");
    }
    url.trim_end_matches('/').to_string()
}

/// Concatenated `text` content blocks of a Messages API reply.
fn response_text(v: &Value) -> Option<String> {
    let text = v
        .get("content")?
        .as_array()?
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
