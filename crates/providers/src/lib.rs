//! LLM Provider implementations for Agentry.
//!
//! All providers implement the `agentry_core::Provider` trait.
//! The registry resolves a `(provider, model)` pair from configuration.

pub mod anthropic;
pub mod openai_compat;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use registry::{ChatBackend, ModelInfo, ModelRegistry, build_from_config};
