//! # Agentry Core
//!
//! Domain types, traits, and error definitions for the Agentry agent.
//! It holds no HTTP, process, or CLI code: it defines the domain model that
//! the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! The two collaborators of the agent loop are defined as traits here:
//! - [`Provider`] turns a conversation into assistant text
//! - [`Tool`] performs one side-effecting action and returns text
//!
//! Implementations live in their respective crates, so the loop can be
//! exercised end-to-end with scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{Tool, ToolCatalog, ToolResult};
