//! Subcommand implementations and the setup they share.

pub mod agent;
pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod tools;

use std::path::Path;
use std::sync::Arc;

use agentry_config::AppConfig;
use agentry_core::tool::ToolCatalog;
use agentry_providers::{ChatBackend, build_from_config};

use crate::ModelArgs;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load_from(path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Resolve the requested provider and model into a chat backend.
pub fn resolve_backend(
    config: &AppConfig,
    target: &ModelArgs,
) -> Result<ChatBackend, Box<dyn std::error::Error>> {
    let registry = build_from_config(config);
    Ok(registry.backend(&target.provider, &target.model, &config.agent)?)
}

/// Build the catalog of enabled tools.
pub fn tool_catalog(config: &AppConfig) -> Result<Arc<ToolCatalog>, Box<dyn std::error::Error>> {
    Ok(Arc::new(agentry_tools::build_catalog(&config.tools)?))
}
