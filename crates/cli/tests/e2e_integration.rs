//! End-to-end integration tests for the Agentry agent loop.
//!
//! These tests drive `ToolAgent` with a scripted provider against the real
//! tool catalog built from configuration, inside a temporary workspace.

use std::path::Path;
use std::sync::{Arc, Mutex};

use agentry_agent::{AskAgent, BUDGET_EXHAUSTED_MESSAGE, PromptManager, Termination, ToolAgent};
use agentry_config::{AppConfig, ToolsConfig};
use agentry_core::error::ProviderError;
use agentry_core::message::{Message, Role};
use agentry_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use agentry_providers::ChatBackend;
use agentry_tools::build_catalog;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence.
struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn chat(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let text = self
            .replies
            .get(requests.len())
            .cloned()
            .unwrap_or_else(|| panic!("no scripted reply for call #{}", requests.len()));
        requests.push(request.messages);
        Ok(ProviderResponse {
            text,
            usage: Some(Usage {
                prompt_tokens: 12,
                completion_tokens: 8,
                total_tokens: 20,
            }),
            model: request.model,
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn file_tools(root: &Path) -> ToolsConfig {
    let mut tools = ToolsConfig::default();
    tools.read_file.enabled = true;
    tools.read_file.root_dir = root.to_path_buf();
    tools.write_file.enabled = true;
    tools.write_file.root_dir = root.to_path_buf();
    tools
}

fn agent_over(provider: Arc<ScriptedProvider>, tools: &ToolsConfig, max_steps: u32) -> ToolAgent {
    let catalog = Arc::new(build_catalog(tools).unwrap());
    ToolAgent::new(
        ChatBackend::new(provider, "e2e-model"),
        catalog,
        &PromptManager::default(),
    )
    .with_max_steps(max_steps)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn write_then_read_then_answer() {
    let workspace = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&[
        r#"{"tool": "write_file", "tool_input": {"path": "notes/todo.txt", "content": "buy milk"}}"#,
        "```json\n{\"tool\": \"read_file\", \"tool_input\": {\"path\": \"notes/todo.txt\"}}\n```",
        r#"{"tool": null, "final_answer": "The note says: buy milk"}"#,
    ]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    let run = agent.run_task("Save a todo and read it back").await.unwrap();

    assert_eq!(run.answer, "The note says: buy milk");
    assert_eq!(run.termination, Termination::FinalAnswer);
    assert_eq!(run.steps_used, 3);
    assert_eq!(
        std::fs::read_to_string(workspace.path().join("notes/todo.txt")).unwrap(),
        "buy milk"
    );

    // The read result is what the model saw before answering.
    let last_request = provider.request(2);
    let observation = &last_request[last_request.len() - 1];
    assert_eq!(observation.role, Role::User);
    assert_eq!(
        observation.content,
        "Result from tool 'read_file' with input {\"path\":\"notes/todo.txt\"}:\nbuy milk"
    );
}

#[tokio::test]
async fn system_prompt_lists_enabled_tools_only() {
    let workspace = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&[r#"{"tool": null, "final_answer": "ok"}"#]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    agent.run("anything").await.unwrap();

    let system = &provider.request(0)[0];
    assert_eq!(system.role, Role::System);
    assert!(system.content.contains("Available tools:\n- read_file: "));
    assert!(system.content.contains("- write_file: "));
    assert!(!system.content.contains("shell_command"));
}

#[tokio::test]
async fn path_escape_is_reported_and_loop_continues() {
    let workspace = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&[
        r#"{"tool": "read_file", "tool_input": {"path": "../../etc/passwd"}}"#,
        r#"{"tool": null, "final_answer": "refused"}"#,
    ]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    let run = agent.run_task("Read the password file").await.unwrap();

    assert_eq!(run.answer, "refused");
    let observation = provider.request(1).last().unwrap().content.clone();
    assert!(observation.starts_with("Result from tool 'read_file' with input"));
    assert!(observation.contains("Tool 'read_file' raised an error"));
}

#[tokio::test]
async fn disabled_tool_is_not_available() {
    let workspace = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&[
        r#"{"tool": "web_fetch", "tool_input": {"url": "https://example.com"}}"#,
        r#"{"tool": null, "final_answer": "no web access"}"#,
    ]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    let run = agent.run_task("Fetch example.com").await.unwrap();

    assert_eq!(run.answer, "no web access");
    assert_eq!(
        provider.request(1).last().unwrap().content,
        "Tool 'web_fetch' is not available."
    );
}

#[tokio::test]
async fn overwrite_refusal_is_fed_back() {
    let workspace = tempfile::tempdir().unwrap();
    std::fs::write(workspace.path().join("keep.txt"), "original").unwrap();
    let provider = ScriptedProvider::new(&[
        r#"{"tool": "write_file", "tool_input": {"path": "keep.txt", "content": "new"}}"#,
        r#"{"tool": null, "final_answer": "left it alone"}"#,
    ]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    agent.run("Replace keep.txt").await.unwrap();

    assert_eq!(
        std::fs::read_to_string(workspace.path().join("keep.txt")).unwrap(),
        "original"
    );
    assert!(
        provider
            .request(1)
            .last()
            .unwrap()
            .content
            .contains("overwrite is false")
    );
}

#[tokio::test]
async fn budget_caps_backend_calls() {
    let workspace = tempfile::tempdir().unwrap();
    let call = r#"{"tool": "read_file", "tool_input": {"path": "missing.txt"}}"#;
    let provider = ScriptedProvider::new(&[call, call, call]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 3);

    let run = agent.run_task("Loop forever").await.unwrap();

    assert_eq!(run.answer, BUDGET_EXHAUSTED_MESSAGE);
    assert_eq!(run.termination, Termination::BudgetExhausted);
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn two_prose_replies_end_the_task() {
    let workspace = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&["Sure, let me think.", "  Still thinking.  "]);
    let agent = agent_over(provider.clone(), &file_tools(workspace.path()), 4);

    let run = agent.run_task("Do something").await.unwrap();

    assert_eq!(run.answer, "Still thinking.");
    assert_eq!(run.termination, Termination::MalformedLimit);
    assert_eq!(provider.calls(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn shell_allowlist_through_the_loop() {
    let workspace = tempfile::tempdir().unwrap();
    let mut tools = ToolsConfig::default();
    tools.shell.enabled = true;
    tools.shell.allowed_commands = vec!["echo".into()];
    tools.shell.working_dir = workspace.path().to_path_buf();

    let provider = ScriptedProvider::new(&[
        r#"{"tool": "shell_command", "tool_input": {"command": "echo hello"}}"#,
        r#"{"tool": "shell_command", "tool_input": {"command": "rm -rf ."}}"#,
        r#"{"tool": null, "final_answer": "done"}"#,
    ]);
    let agent = agent_over(provider.clone(), &tools, 4);

    agent.run("Say hello").await.unwrap();

    let echoed = provider.request(1).last().unwrap().content.clone();
    assert!(echoed.contains("STDOUT:\nhello"));
    assert!(echoed.ends_with("Return code: 0"));

    let denied = provider.request(2).last().unwrap().content.clone();
    assert!(denied.contains("Tool 'shell_command' raised an error"));
}

#[tokio::test]
async fn yaml_config_drives_catalog_and_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path().join("ws");
    let config_path = dir.path().join("agentry.yaml");
    std::fs::write(
        &config_path,
        format!(
            "agent:\n  max_steps: 2\nprompts:\n  ask_system: Answer tersely.\ntools:\n  read_file:\n    enabled: true\n    root_dir: {}\n",
            workspace.display()
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&config_path).unwrap();
    assert_eq!(config.agent.max_steps, 2);

    let catalog = build_catalog(&config.tools).unwrap();
    assert_eq!(catalog.names(), vec!["read_file"]);
    assert!(workspace.is_dir());

    let provider = ScriptedProvider::new(&["Yes."]);
    let ask = AskAgent::new(
        ChatBackend::new(provider.clone(), "e2e-model"),
        &PromptManager::new(&config.prompts),
    );
    assert_eq!(ask.ask("Is this terse?").await.unwrap(), "Yes.");
    assert_eq!(provider.request(0)[0].content, "Answer tersely.");
}

#[tokio::test]
async fn identical_scripts_give_identical_runs() {
    let script = [
        r#"{"tool": "read_file", "tool_input": {"path": "nothing.txt"}}"#,
        r#"{"tool": null, "final_answer": "not found"}"#,
    ];
    let workspace = tempfile::tempdir().unwrap();
    let tools = file_tools(workspace.path());

    let first = agent_over(ScriptedProvider::new(&script), &tools, 4)
        .run_task("look")
        .await
        .unwrap();
    let second = agent_over(ScriptedProvider::new(&script), &tools, 4)
        .run_task("look")
        .await
        .unwrap();

    assert_eq!(first.answer, second.answer);
    assert_eq!(first.conversation.len(), second.conversation.len());
}
