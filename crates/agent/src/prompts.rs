//! System prompts for ask mode and tool-enabled agent mode.

use agentry_config::PromptsConfig;
use agentry_core::tool::ToolCatalog;

/// Default system prompt for ask mode.
pub const DEFAULT_ASK_SYSTEM: &str = "You are a helpful assistant. Answer the user's question clearly and concisely. Do not claim to execute actions or tools in this mode.";

/// Default system prompt for agent mode; describes the JSON response protocol.
pub const DEFAULT_AGENT_SYSTEM: &str = r#"You are a tool-using AI agent. You can call tools to browse the web, read and write files, and run commands in a safe, restricted way.

You must always respond in JSON ONLY, with one of the following forms:

1) To call a tool:
{
  "tool": "tool_name",
  "tool_input": { ... }
}

2) To provide a final answer (no more tool calls):
{
  "tool": null,
  "final_answer": "..."
}

Never include any non-JSON text in your response. Tool names and input must match the descriptions you are given."#;

/// Supplies the fixed system prompt text, configured or default.
#[derive(Debug, Clone)]
pub struct PromptManager {
    ask_system: String,
    agent_system: String,
}

impl PromptManager {
    pub fn new(config: &PromptsConfig) -> Self {
        Self {
            ask_system: config
                .ask_system
                .clone()
                .unwrap_or_else(|| DEFAULT_ASK_SYSTEM.into()),
            agent_system: config
                .agent_system
                .clone()
                .unwrap_or_else(|| DEFAULT_AGENT_SYSTEM.into()),
        }
    }

    pub fn ask_system(&self) -> &str {
        &self.ask_system
    }

    pub fn agent_system(&self) -> &str {
        &self.agent_system
    }

    /// The agent prompt followed by the catalog's tool listing.
    pub fn agent_system_prompt(&self, catalog: &ToolCatalog) -> String {
        format!(
            "{}\n\nAvailable tools:\n{}",
            self.agent_system,
            catalog.render_listing()
        )
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new(&PromptsConfig::default())
    }
}
