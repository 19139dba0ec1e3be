//! Shared test helpers for agent tests.

use std::sync::{Arc, Mutex};

use agentry_core::error::{ProviderError, ToolError};
use agentry_core::message::Message;
use agentry_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use agentry_core::tool::{Tool, ToolResult};
use agentry_providers::ChatBackend;
use async_trait::async_trait;

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `chat` returns the next reply in the queue and records the
/// messages it was sent. Panics if more calls are made than replies provided.
pub struct SequentialMockProvider {
    replies: Vec<Result<String, ProviderError>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl SequentialMockProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self::with_results(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The messages sent on call `n` (0-based).
    pub fn request(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn chat(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        let reply = self.replies.get(call).cloned().unwrap_or_else(|| {
            panic!(
                "SequentialMockProvider: no more replies (call #{call}, have {})",
                self.replies.len()
            )
        });
        requests.push(request.messages);
        reply.map(|text| ProviderResponse {
            text,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// A backend over a scripted provider, plus a handle to inspect it.
pub fn scripted_backend(replies: &[&str]) -> (ChatBackend, Arc<SequentialMockProvider>) {
    let provider = Arc::new(SequentialMockProvider::new(replies));
    (ChatBackend::new(provider.clone(), "mock-model"), provider)
}

/// A tool that always answers with the same text.
pub struct StaticTool {
    name: &'static str,
    description: &'static str,
    output: &'static str,
}

impl StaticTool {
    pub fn new(name: &'static str, description: &'static str, output: &'static str) -> Self {
        Self {
            name,
            description,
            output,
        }
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        self.description
    }
    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::success(self.output))
    }
}

/// A tool whose handler always fails.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "flaky"
    }
    fn description(&self) -> &str {
        "Always fails."
    }
    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult, ToolError> {
        Err(ToolError::ExecutionFailed {
            tool_name: "flaky".into(),
            reason: "disk on fire".into(),
        })
    }
}

/// A tool whose handler panics.
pub struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "boom"
    }
    fn description(&self) -> &str {
        "Always panics."
    }
    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult, ToolError> {
        panic!("handler exploded");
    }
}
