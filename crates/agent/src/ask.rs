//! Simple ask mode: one question, one model call, no tools.

use agentry_core::message::Conversation;
use agentry_providers::ChatBackend;
use tracing::debug;

use crate::prompts::PromptManager;

pub struct AskAgent {
    backend: ChatBackend,
    system_prompt: String,
}

impl AskAgent {
    pub fn new(backend: ChatBackend, prompts: &PromptManager) -> Self {
        Self {
            backend,
            system_prompt: prompts.ask_system().to_string(),
        }
    }

    /// Send `[system, user(question)]` once and return the reply verbatim.
    pub async fn ask(&self, question: &str) -> agentry_core::Result<String> {
        let conversation = Conversation::with_task(&self.system_prompt, question);
        debug!(
            provider = %self.backend.provider_name(),
            model = %self.backend.model(),
            "Asking"
        );
        Ok(self.backend.chat(conversation.messages()).await?)
    }
}
