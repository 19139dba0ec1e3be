//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! execute shell commands, read/write files, search and fetch the web.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ToolError;

/// The textual result of a tool execution.
///
/// Both outcomes carry text for the conversation; `success` only records
/// which one it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// The core Tool trait.
///
/// Each tool (shell_command, read_file, write_file, web_search, web_fetch)
/// implements this trait and is registered in a [`ToolCatalog`].
/// Implementations own their timeouts: a slow action must come back as a
/// failed [`ToolResult`] or a [`ToolError`], never hang.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "shell_command", "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does and its input (sent to the LLM).
    fn description(&self) -> &str;

    /// Execute the tool with the given input object.
    async fn execute(&self, input: serde_json::Value) -> std::result::Result<ToolResult, ToolError>;
}

/// A registry of available tools, in registration order.
///
/// The agent loop uses this to:
/// 1. Render the tool list for the system prompt
/// 2. Look up a tool when the model requests it by name
///
/// Built once at startup, then shared read-only.
pub struct ToolCatalog {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping the original listing position.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => {
                tracing::debug!(tool = %name, "Replacing registered tool");
                self.tools[slot] = tool;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// `(name, description)` pairs in registration order.
    pub fn list_all(&self) -> Vec<(&str, &str)> {
        self.tools
            .iter()
            .map(|t| (t.name(), t.description()))
            .collect()
    }

    /// One `- name: description` line per tool, in registration order.
    pub fn render_listing(&self) -> String {
        self.list_all()
            .iter()
            .map(|(name, description)| format!("- {name}: {description}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool {
        description: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { self.description }
        async fn execute(&self, input: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            let text = input["text"].as_str().unwrap_or("").to_string();
            Ok(ToolResult::success(text))
        }
    }

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str { self.0 }
        fn description(&self) -> &str { "named" }
        async fn execute(&self, _input: serde_json::Value) -> std::result::Result<ToolResult, ToolError> {
            Ok(ToolResult::success(self.0))
        }
    }

    #[test]
    fn catalog_register_and_lookup() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool { description: "Echoes back the input" }));
        assert!(catalog.lookup("echo").is_some());
        assert!(catalog.lookup("nonexistent").is_none());
    }

    #[test]
    fn listing_follows_registration_order() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(NamedTool("zeta")));
        catalog.register(Box::new(NamedTool("alpha")));
        catalog.register(Box::new(NamedTool("mid")));
        assert_eq!(catalog.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            catalog.render_listing(),
            "- zeta: named\n- alpha: named\n- mid: named"
        );
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool { description: "first" }));
        catalog.register(Box::new(NamedTool("other")));
        catalog.register(Box::new(EchoTool { description: "second" }));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.list_all(), vec![("echo", "second"), ("other", "named")]);
        assert_eq!(catalog.lookup("echo").unwrap().description(), "second");
    }

    #[test]
    fn empty_catalog_renders_nothing() {
        let catalog = ToolCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.render_listing(), "");
    }

    #[tokio::test]
    async fn looked_up_tool_executes() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool { description: "echo" }));

        let tool = catalog.lookup("echo").unwrap();
        let result = tool
            .execute(serde_json::json!({"text": "hello world"}))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::success("hello world"));
    }
}
