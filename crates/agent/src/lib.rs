//! The agent loop: the heart of Agentry.
//!
//! In agent mode the model follows a JSON **call a tool → observe → answer**
//! cycle:
//!
//! 1. **Seed** the conversation with the agent prompt (listing the tools)
//!    and the caller's task
//! 2. **Send** it to the configured chat backend
//! 3. **Parse** the reply into a protocol decision
//! 4. **If a tool call**: execute it, append the result, loop back to step 2
//! 5. **If a final answer**: return it to the caller
//!
//! The loop also stops after two replies that are not JSON, or when the
//! step budget runs out. Ask mode skips all of this and makes one call.

pub mod ask;
pub mod loop_runner;
pub mod prompts;
pub mod protocol;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use ask::AskAgent;
pub use loop_runner::{
    BUDGET_EXHAUSTED_MESSAGE, CORRECTIVE_MESSAGE, TaskRun, Termination, ToolAgent,
};
pub use prompts::{DEFAULT_AGENT_SYSTEM, DEFAULT_ASK_SYSTEM, PromptManager};
pub use protocol::{Decision, parse_response};
