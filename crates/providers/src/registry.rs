//! Model registry: maps `(provider, model key)` to a provider client and
//! model metadata, and hands out ready-to-use chat backends.

use std::collections::HashMap;
use std::sync::Arc;

use agentry_config::{AgentSettings, AppConfig, ProviderKind};
use agentry_core::error::ProviderError;
use agentry_core::message::Message;
use agentry_core::provider::{Provider, ProviderRequest};
use tracing::debug;

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Metadata about one configured model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub provider: String,
    /// The key used to select this model on the command line
    pub key: String,
    /// The provider-side model identifier
    pub name: String,
    pub supports_tools: bool,
    pub supports_stream: bool,
    pub max_context_tokens: u32,
}

/// Providers by name plus their models by key.
#[derive(Default)]
pub struct ModelRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    models: HashMap<(String, String), ModelInfo>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider client under `name`.
    pub fn register_provider(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Register a model. Its provider must be registered to be resolvable.
    pub fn register_model(&mut self, model: ModelInfo) {
        self.models
            .insert((model.provider.clone(), model.key.clone()), model);
    }

    /// Get a specific provider by name.
    pub fn provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Look up a provider client and model metadata.
    pub fn resolve(
        &self,
        provider: &str,
        model_key: &str,
    ) -> std::result::Result<(Arc<dyn Provider>, &ModelInfo), ProviderError> {
        let client = self.provider(provider).ok_or_else(|| {
            ProviderError::NotConfigured(format!("Provider '{provider}' not registered."))
        })?;
        let info = self
            .models
            .get(&(provider.to_string(), model_key.to_string()))
            .ok_or_else(|| {
                ProviderError::ModelNotFound(format!(
                    "Model '{model_key}' not registered for provider '{provider}'."
                ))
            })?;
        Ok((client, info))
    }

    /// Resolve a model and bind it to the sampling settings.
    pub fn backend(
        &self,
        provider: &str,
        model_key: &str,
        settings: &AgentSettings,
    ) -> std::result::Result<ChatBackend, ProviderError> {
        let (client, info) = self.resolve(provider, model_key)?;
        Ok(ChatBackend::new(client, info.name.clone())
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens))
    }
}

/// Build the registry from configuration.
///
/// Only enabled providers are registered, each with its configured models.
pub fn build_from_config(config: &AppConfig) -> ModelRegistry {
    let mut registry = ModelRegistry::new();

    for (name, provider_config) in config.providers.iter().filter(|(_, p)| p.enabled) {
        let key_env = provider_config.api_key_env_for(name);
        let base_url = provider_config.base_url_for(name).unwrap_or_default();

        let provider: Arc<dyn Provider> = match provider_config.kind_for(name) {
            ProviderKind::Anthropic => Arc::new(
                AnthropicProvider::from_env(key_env)
                    .with_name(name.clone())
                    .with_base_url(base_url),
            ),
            ProviderKind::Openai => {
                Arc::new(OpenAiCompatProvider::from_env(name.clone(), base_url, key_env))
            }
        };
        registry.register_provider(name.clone(), provider);

        for (key, model) in &provider_config.models {
            registry.register_model(ModelInfo {
                provider: name.clone(),
                key: key.clone(),
                name: model.name.clone(),
                supports_tools: model.supports_tools,
                supports_stream: model.supports_stream,
                max_context_tokens: model
                    .max_context_tokens
                    .unwrap_or_else(|| provider_config.default_context_tokens(name)),
            });
        }

        debug!(
            provider = %name,
            models = provider_config.models.len(),
            "Registered provider"
        );
    }

    registry
}

/// A resolved `(provider, model)` pair plus sampling settings.
///
/// This is the only thing the agent loop knows about the model: send the
/// conversation, get the reply text back.
#[derive(Clone)]
pub struct ChatBackend {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatBackend {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the messages and return the reply text.
    pub async fn chat(&self, messages: &[Message]) -> std::result::Result<String, ProviderError> {
        let mut request = ProviderRequest::new(self.model.clone(), messages.to_vec());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        let response = self.provider.chat(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                provider = %self.provider.name(),
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat reply received"
            );
        }
        Ok(response.text)
    }
}

impl std::fmt::Debug for ChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBackend")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
