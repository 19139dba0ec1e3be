//! Shell tool: execute system commands.
//!
//! Supports command allowlisting, workspace scoping, and timeout.

use std::path::PathBuf;
use std::time::Duration;

use agentry_core::error::ToolError;
use agentry_core::tool::{Tool, ToolResult};
use agentry_security::{CommandAllowlist, CommandCheckResult};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::args;

const NAME: &str = "shell_command";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on a model-requested timeout.
const MAX_TIMEOUT_SECS: u64 = 60;

/// Execute shell commands with safety constraints.
pub struct ShellTool {
    allowlist: CommandAllowlist,
    working_dir: PathBuf,
}

impl ShellTool {
    /// `working_dir` is where every command runs; it must exist.
    pub fn new(allowed_commands: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            allowlist: CommandAllowlist::new(allowed_commands),
            working_dir: working_dir.into(),
        }
    }

    fn render_output(output: &std::process::Output) -> String {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output.status.code().unwrap_or(-1);

        let mut text = String::new();
        if !stdout.is_empty() {
            text.push_str(&format!("STDOUT:\n{stdout}\n"));
        }
        if !stderr.is_empty() {
            text.push_str(&format!("STDERR:\n{stderr}\n"));
        }
        text.push_str(&format!("Return code: {code}"));
        text
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Execute a shell command (very restricted). Input: {\"command\": str, \"timeout\": int}."
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(NAME, &input)?;
        let command = args::required_str(NAME, args, "command")?;
        let timeout_secs =
            args::u64_or(NAME, args, "timeout", DEFAULT_TIMEOUT_SECS)?.min(MAX_TIMEOUT_SECS);

        match self.allowlist.check(command) {
            CommandCheckResult::Allowed => {}
            CommandCheckResult::Empty => {
                return Err(ToolError::InvalidArguments(format!(
                    "{NAME}: empty command after parsing"
                )));
            }
            CommandCheckResult::Denied { reason, .. } => {
                return Err(ToolError::PermissionDenied {
                    tool_name: NAME.into(),
                    reason,
                });
            }
        }

        debug!(command = %command, cwd = %self.working_dir.display(), "Executing shell command");

        let mut child = if cfg!(target_os = "windows") {
            Command::new("cmd")
        } else {
            Command::new("sh")
        };
        child
            .arg(if cfg!(target_os = "windows") { "/C" } else { "-c" })
            .arg(command)
            .current_dir(&self.working_dir)
            .kill_on_drop(true);

        let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), child.output()).await
        {
            Ok(result) => result.map_err(|e| ToolError::ExecutionFailed {
                tool_name: NAME.into(),
                reason: e.to_string(),
            })?,
            Err(_) => {
                warn!(command = %command, timeout_secs, "Command timed out");
                return Ok(ToolResult::failure(format!(
                    "{NAME}: command timed out after {timeout_secs} seconds."
                )));
            }
        };

        let text = Self::render_output(&output);
        if output.status.success() {
            Ok(ToolResult::success(text))
        } else {
            warn!(command = %command, exit_code = output.status.code().unwrap_or(-1), "Command failed");
            Ok(ToolResult::failure(text))
        }
    }
}
