//! Message and Conversation domain types.
//!
//! A conversation is owned by exactly one agent invocation: it is seeded with
//! a single system message and the caller's task, then grows strictly
//! user/assistant/user/... until the invocation returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (one agent invocation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (response protocol, tool list)
    System,
    /// The caller, or the agent speaking on the caller's behalf
    /// (tool results, corrective instructions)
    User,
    /// The model
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// An append-only, ordered message history.
///
/// Invariants:
/// - exactly one system message, at index 0, never replaced;
/// - after it, roles alternate user / assistant in append order;
/// - nothing is edited or removed once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start a conversation with its one system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: vec![Message::system(system_prompt)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Start a conversation seeded as `[system, user(task)]`.
    pub fn with_task(system_prompt: impl Into<String>, task: impl Into<String>) -> Self {
        let mut conversation = Self::new(system_prompt);
        conversation.push_user(task);
        conversation
    }

    /// Append a user message. Must follow the system or an assistant message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Append an assistant message. Must follow a user message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        debug_assert!(
            self.next_role() == message.role,
            "conversation expects a {} message next, got {}",
            self.next_role().as_str(),
            message.role.as_str()
        );
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// The role the next appended message must have.
    pub fn next_role(&self) -> Role {
        match self.messages.last().map(|m| m.role) {
            Some(Role::User) => Role::Assistant,
            _ => Role::User,
        }
    }

    /// All messages, system message first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The leading system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// The most recently appended message.
    pub fn last(&self) -> &Message {
        // Never empty: the system message is inserted on construction.
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages, including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; a conversation holds at least its system message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
