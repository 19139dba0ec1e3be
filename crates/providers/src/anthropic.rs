//! Anthropic native provider implementation.
//!
//! Uses Anthropic's Messages API directly (not OpenAI-compatible proxy).
//!
//! Features:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - System prompt as top-level field

use async_trait::async_trait;
use agentry_core::error::ProviderError;
use agentry_core::message::{Message, Role};
use agentry_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::openai_compat::transport_error;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 2048;
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic native Messages API provider.
pub struct AnthropicProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::build(Some(api_key.into()), API_KEY_ENV.into())
    }

    /// Create a provider whose key comes from the environment variable `api_key_env`.
    pub fn from_env(api_key_env: impl Into<String>) -> Self {
        let api_key_env = api_key_env.into();
        let api_key = std::env::var(&api_key_env).ok().filter(|k| !k.is_empty());
        Self::build(api_key, api_key_env)
    }

    fn build(api_key: Option<String>, api_key_env: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            api_key_env,
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Register under a different provider name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn api_key(&self) -> std::result::Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Environment variable '{}' is not set for provider '{}'.",
                self.api_key_env, self.name
            ))
        })
    }

    /// Extract system messages from the message list.
    /// Anthropic puts system prompt as a top-level field, not in messages.
    fn extract_system(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut turns = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::User | Role::Assistant => turns.push(AnthropicMessage {
                    role: msg.role.as_str().into(),
                    content: msg.content.clone(),
                }),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, turns)
    }

    /// Join all text blocks of a response; non-text blocks are skipped.
    fn response_text(resp: &AnthropicResponse) -> String {
        resp.content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl agentry_core::Provider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/messages", self.base_url);
        let (system, messages) = Self::extract_system(&request.messages);

        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": request.temperature,
        });

        if let Some(ref sys) = system {
            body["system"] = serde_json::json!(sys);
        }

        debug!(provider = %self.name, model = %request.model, "Sending chat request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Anthropic API key".into(),
            ));
        }
        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Anthropic API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: AnthropicResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: status,
                message: format!("Failed to parse Anthropic response: {e}"),
            })?;

        let usage = api_resp.usage.as_ref().map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        Ok(ProviderResponse {
            text: Self::response_text(&api_resp),
            usage,
            model: api_resp.model.unwrap_or(request.model),
        })
    }
}

// --- Anthropic API types ---

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ResponseContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
