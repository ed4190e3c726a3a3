//! AI completion gateway client
//!
//! Encapsulates the outbound chat-completion call shared by every function.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::errors::MediError;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// A single-shot text completion. Implemented by `LlmClient` for the real
/// gateway and by in-memory fakes in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `RateLimited` / `QuotaExhausted` for upstream 429 / 402 and
    /// `Unavailable` for any other upstream failure.
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, MediError>;
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model_name: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, MediError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                MediError::Config(format!("Failed to build AI gateway HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_key: config.ai_gateway_api_key.clone(),
            endpoint: config.ai_gateway_url.to_string(),
            model_name: config.ai_model.clone(),
        })
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, MediError> {
        #[cfg(feature = "debug-logs")]
        info!("Using completion prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            messages = prompt.len(),
            estimated_input_tokens = prompt
                .iter()
                .map(|m| match &m.content {
                    Content::Text(t) => estimate_tokens(t),
                    Content::ImageUrl(_) => 0,
                })
                .sum::<usize>(),
            model = %self.model_name,
            "Requesting completion"
        );

        let request_body = json!({
            "model": self.model_name,
            "messages": build_chat_messages(&prompt),
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| MediError::Http(format!("AI gateway request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            error!(status = status.as_u16(), body = %error_text, "AI gateway error");
            return Err(MediError::from_status(
                status.as_u16(),
                format!("AI gateway error (status {status})"),
            ));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            MediError::MalformedResponse(format!("Failed to parse AI gateway response: {e}"))
        })?;

        Ok(extract_completion_text(&response_json))
    }
}

/// Chat completions wire format for a prompt. Image parts are dropped; none of
/// the functions send images.
pub(crate) fn build_chat_messages(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            match &m.content {
                Content::Text(t) => Some(json!({ "role": role_str, "content": t })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

/// `choices[0].message.content`, or an empty string when the gateway returned
/// no text.
#[must_use]
pub fn extract_completion_text(response: &Value) -> String {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string()
}
