//! Security module for Agentry: workspace sandboxing for tools.
//!
//! Provides:
//! - **Path validation**: file tools are confined to their root directory
//! - **Allowlists**: which base commands the shell tool may run

pub mod allowlist;
pub mod path;

pub use allowlist::{CommandAllowlist, CommandCheckResult, base_command};
pub use path::{PathValidationError, resolve_in_root};
