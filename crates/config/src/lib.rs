//! Configuration loading, validation, and management for Agentry.
//!
//! Loads configuration from a TOML file (or YAML, by extension). API keys are
//! never stored in the file: each provider names the environment variable
//! that holds its key. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tool-calling loop settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// System prompt overrides
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Provider-specific configurations, keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Built-in tool configurations
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Step budget: maximum model round-trips per task
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_steps() -> u32 {
    4
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// System prompt for ask mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_system: Option<String>,

    /// System prompt for tool-enabled agent mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_system: Option<String>,
}

/// Which wire protocol a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI Chat Completions (also Perplexity and other compatible APIs)
    Openai,
    /// Anthropic Messages API
    Anthropic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Wire protocol; inferred from the provider name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProviderKind>,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Models exposed by this provider, keyed by the name used on the CLI
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,
}

impl ProviderConfig {
    /// The configured kind, or the one implied by the provider name.
    pub fn kind_for(&self, provider_name: &str) -> ProviderKind {
        self.kind.unwrap_or(match provider_name {
            "anthropic" => ProviderKind::Anthropic,
            _ => ProviderKind::Openai,
        })
    }

    /// The configured key variable, or the conventional one for this provider.
    pub fn api_key_env_for(&self, provider_name: &str) -> String {
        if let Some(var) = &self.api_key_env {
            return var.clone();
        }
        match provider_name {
            "anthropic" => "ANTHROPIC_API_KEY".into(),
            "perplexity" => "PERPLEXITY_API_KEY".into(),
            "openai" => "OPENAI_API_KEY".into(),
            other => format!("{}_API_KEY", other.to_uppercase().replace('-', "_")),
        }
    }

    /// The configured base URL, or the well-known one for this provider.
    pub fn base_url_for(&self, provider_name: &str) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| default_base_url(provider_name).map(String::from))
    }

    /// Context window used when a model entry does not set one.
    pub fn default_context_tokens(&self, provider_name: &str) -> u32 {
        match self.kind_for(provider_name) {
            ProviderKind::Anthropic => 200_000,
            ProviderKind::Openai => 8192,
        }
    }
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openai" => Some("https://api.openai.com/v1"),
        "perplexity" => Some("https://api.perplexity.ai"),
        "anthropic" => Some("https://api.anthropic.com"),
        "ollama" => Some("http://localhost:11434/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The provider-side model identifier
    pub name: String,

    #[serde(default)]
    pub supports_tools: bool,

    #[serde(default = "default_true")]
    pub supports_stream: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_tokens: Option<u32>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub shell: ShellToolConfig,

    #[serde(default)]
    pub read_file: FileToolConfig,

    #[serde(default)]
    pub write_file: FileToolConfig,

    #[serde(default)]
    pub web_search: WebSearchConfig,

    #[serde(default)]
    pub web_fetch: WebFetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellToolConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Allowed base commands. Empty = no restriction.
    #[serde(default = "default_allowed_commands")]
    pub allowed_commands: Vec<String>,

    #[serde(default = "default_workspace")]
    pub working_dir: PathBuf,
}

fn default_allowed_commands() -> Vec<String> {
    vec!["ls".into(), "echo".into()]
}
fn default_workspace() -> PathBuf {
    PathBuf::from("workspace")
}

impl Default for ShellToolConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_commands: default_allowed_commands(),
            working_dir: default_workspace(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileToolConfig {
    #[serde(default)]
    pub enabled: bool,

    /// All paths are resolved inside this directory
    #[serde(default = "default_workspace")]
    pub root_dir: PathBuf,
}

impl Default for FileToolConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            root_dir: default_workspace(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSearchConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Search API endpoint; falls back to `SEARCH_API_ENDPOINT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl WebSearchConfig {
    /// The configured endpoint, or the `SEARCH_API_ENDPOINT` environment variable.
    pub fn resolved_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| std::env::var("SEARCH_API_ENDPOINT").ok().filter(|e| !e.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebFetchConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl AppConfig {
    /// Load configuration from a file path.
    ///
    /// `.yaml` / `.yml` files are parsed as YAML, everything else as TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|reason| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        })?;

        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            providers = config.providers.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    fn from_yaml_str(content: &str) -> Result<Self, String> {
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        match value {
            // An empty document means "all defaults".
            serde_yaml::Value::Null => Ok(Self::default()),
            serde_yaml::Value::Mapping(_) => {
                serde_yaml::from_value(value).map_err(|e| e.to_string())
            }
            _ => Err("Top-level configuration must be a mapping".into()),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.temperature < 0.0 || self.agent.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "agent.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        for (name, provider) in self.providers.iter().filter(|(_, p)| p.enabled) {
            if provider.base_url_for(name).is_none_or(|url| url.is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{name}.base_url is required for a provider without a known default"
                )));
            }
            if let Some((key, _)) = provider.models.iter().find(|(_, m)| m.name.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{name}.models.{key}.name must not be empty"
                )));
            }
        }

        if self.tools.web_search.enabled && self.tools.web_search.resolved_endpoint().is_none() {
            return Err(ConfigError::ValidationError(
                "tools.web_search requires an endpoint (config or SEARCH_API_ENDPOINT)".into(),
            ));
        }

        Ok(())
    }

    /// Names of providers with `enabled = true`, sorted.
    pub fn enabled_providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .providers
            .iter()
            .filter(|(_, p)| p.enabled)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
