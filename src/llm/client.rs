use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::response::extract_text;
use super::types::{ApiError, Message, MessagesRequest, MessagesResponse};
use crate::config::{ApiKey, Config};

const API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
/// Summaries can run long; this overrides the client-wide request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Single-turn text completion.
/// Implemented by `LlmClient` for production; mock implementations used in tests.
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32)
    -> Result<String, LlmError>;
}

#[derive(Clone, Debug)]
pub struct LlmClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl LlmClient {
    /// `None` when no credential is configured: callers degrade instead of failing.
    pub fn from_config(http: Client, config: &Config) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::for_tests(),
            model: "test-model".to_string(),
            base_url: base_url.to_string(),
        }
    }

    async fn create_message(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<MessagesResponse, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            system: Some(system).filter(|s| !s.is_empty()),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("LLM API rate limited");
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<MessagesResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(status.as_u16(), err);
                warn!(error = %classified, "LLM API error");
                return Err(classified);
            }
            let end = text.floor_char_boundary(200);
            warn!(status = %status, "LLM API error (no structured body)");
            return Err(LlmError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {}", &text[..end]),
            });
        }

        let body: MessagesResponse = response.json().await?;
        debug!(model = %self.model, "completion received");

        if let Some(err) = &body.error {
            let classified = classify_api_error(status.as_u16(), err);
            warn!(error = %classified, "LLM API error in 200 response");
            return Err(classified);
        }

        Ok(body)
    }
}

impl CompletionClient for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let response = self.create_message(system, prompt, max_tokens).await?;
        extract_text(&response).ok_or(LlmError::EmptyResponse)
    }
}

fn classify_api_error(status: u16, err: &ApiError) -> LlmError {
    let message = err
        .message
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());

    match (status, err.kind.as_deref()) {
        (429, _) | (_, Some("rate_limit_error")) => LlmError::RateLimited,
        (_, Some(kind)) => LlmError::Api {
            code: status,
            message: format!("{kind}: {message}"),
        },
        (_, None) => LlmError::Api {
            code: status,
            message,
        },
    }
}
