//! The tool-calling loop implementation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use agentry_core::message::Conversation;
use agentry_core::tool::ToolCatalog;
use agentry_providers::ChatBackend;
use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::prompts::PromptManager;
use crate::protocol::{Decision, parse_response};

/// Returned when the step budget runs out before a final answer.
pub const BUDGET_EXHAUSTED_MESSAGE: &str =
    "Maximum tool-calling steps reached without a final answer.";

/// Sent after a reply that is not valid JSON.
pub const CORRECTIVE_MESSAGE: &str = "Your previous message was not valid JSON. You MUST respond with JSON ONLY as described in the system prompt. Do not include any extra text.";

/// Malformed replies tolerated before giving up.
const MALFORMED_LIMIT: u32 = 2;

/// Default step budget.
const DEFAULT_MAX_STEPS: u32 = 4;

/// Why a task run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model gave a final answer (or reported an error).
    FinalAnswer,
    /// The model replied with JSON the protocol does not understand.
    Opaque,
    /// Too many replies were not valid JSON.
    MalformedLimit,
    /// The step budget ran out.
    BudgetExhausted,
}

/// The outcome of one task.
#[derive(Debug, Clone)]
pub struct TaskRun {
    pub answer: String,
    pub termination: Termination,
    /// Model round-trips made
    pub steps_used: u32,
    /// The full exchange, system prompt first
    pub conversation: Conversation,
}

/// Drives the model through tool calls until it produces an answer.
///
/// Every invocation builds its own conversation; only the catalog is shared.
pub struct ToolAgent {
    backend: ChatBackend,
    catalog: Arc<ToolCatalog>,
    system_prompt: String,
    max_steps: u32,
}

impl ToolAgent {
    /// Create a new agent. The system prompt is the agent prompt plus the
    /// catalog listing, fixed at construction.
    pub fn new(backend: ChatBackend, catalog: Arc<ToolCatalog>, prompts: &PromptManager) -> Self {
        let system_prompt = prompts.agent_system_prompt(&catalog);
        Self {
            backend,
            catalog,
            system_prompt,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run a task and return only the answer text.
    pub async fn run(&self, task: &str) -> agentry_core::Result<String> {
        Ok(self.run_task(task).await?.answer)
    }

    /// Run a task to completion.
    ///
    /// Backend failures end the run and are returned as errors. Everything
    /// else, including malformed replies and failing tools, ends in a
    /// [`TaskRun`].
    pub async fn run_task(&self, task: &str) -> agentry_core::Result<TaskRun> {
        let mut conversation = Conversation::with_task(&self.system_prompt, task);
        let mut malformed = 0u32;
        let mut steps_used = 0u32;

        info!(
            conversation_id = %conversation.id,
            provider = %self.backend.provider_name(),
            model = %self.backend.model(),
            max_steps = self.max_steps,
            "Starting task"
        );

        while steps_used < self.max_steps {
            let step = steps_used + 1;
            let reply = self.backend.chat(conversation.messages()).await?;
            conversation.push_assistant(reply.as_str());
            steps_used = step;

            let outcome = match parse_response(&reply) {
                Decision::Malformed => {
                    malformed += 1;
                    warn!(step, malformed, "Reply is not valid JSON");
                    if malformed >= MALFORMED_LIMIT {
                        Some((reply.trim().to_string(), Termination::MalformedLimit))
                    } else {
                        conversation.push_user(CORRECTIVE_MESSAGE);
                        None
                    }
                }
                Decision::ToolCall { name, input } => {
                    malformed = 0;
                    let message = self.call_tool(step, &name, input).await;
                    conversation.push_user(message);
                    None
                }
                Decision::FinalAnswer { text } => Some((text, Termination::FinalAnswer)),
                Decision::Opaque { text } => Some((text, Termination::Opaque)),
            };

            if let Some((answer, termination)) = outcome {
                return Ok(self.finish(answer, termination, steps_used, conversation));
            }
        }

        Ok(self.finish(
            BUDGET_EXHAUSTED_MESSAGE.into(),
            Termination::BudgetExhausted,
            steps_used,
            conversation,
        ))
    }

    fn finish(
        &self,
        answer: String,
        termination: Termination,
        steps_used: u32,
        conversation: Conversation,
    ) -> TaskRun {
        info!(
            conversation_id = %conversation.id,
            ?termination,
            steps_used,
            messages = conversation.len(),
            "Task finished"
        );
        TaskRun {
            answer,
            termination,
            steps_used,
            conversation,
        }
    }

    /// Dispatch one tool call and render the message that reports it.
    async fn call_tool(&self, step: u32, name: &str, input: Value) -> String {
        let Some(tool) = self.catalog.lookup(name) else {
            warn!(step, tool = %name, "Model requested an unknown tool");
            return format!("Tool '{name}' is not available.");
        };

        debug!(step, tool = %name, input = %input, "Executing tool");

        let outcome = AssertUnwindSafe(tool.execute(input.clone()))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => {
                debug!(step, tool = %name, success = result.success, "Tool finished");
                result.output
            }
            Ok(Err(e)) => {
                warn!(step, tool = %name, error = %e, "Tool failed");
                format!("Tool '{name}' raised an error: {e}")
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                warn!(step, tool = %name, panic = %detail, "Tool panicked");
                format!("Tool '{name}' raised an error: panicked: {detail}")
            }
        };

        format!("Result from tool '{name}' with input {input}:\n{result}")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
