//! File write tool: write text files inside the workspace root.

use std::path::PathBuf;

use agentry_core::error::ToolError;
use agentry_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::debug;

use crate::args;

const NAME: &str = "write_file";

pub struct WriteFileTool {
    root_dir: PathBuf,
}

impl WriteFileTool {
    /// All paths are resolved relative to `root_dir`, which must exist.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Write text content to a file in the safe workspace directory. Input: {\"path\": str, \"content\": str, \"overwrite\": bool}."
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(NAME, &input)?;
        let path = args::required_str(NAME, args, "path")?;
        let content = args::optional_str(NAME, args, "content")?.unwrap_or_default();
        let overwrite = args::bool_or(NAME, args, "overwrite", false)?;

        let resolved = agentry_security::resolve_in_root(&self.root_dir, path).map_err(|e| {
            ToolError::PermissionDenied {
                tool_name: NAME.into(),
                reason: e.to_string(),
            }
        })?;

        if resolved.is_dir() {
            return Ok(ToolResult::failure(format!("'{path}' is a directory.")));
        }
        if resolved.exists() && !overwrite {
            return Ok(ToolResult::failure(
                "file already exists and overwrite is false.",
            ));
        }

        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: NAME.into(),
                    reason: format!("Failed to create directories: {e}"),
                })?;
        }

        match tokio::fs::write(&resolved, content).await {
            Ok(()) => {
                let chars = content.chars().count();
                debug!(path = %resolved.display(), chars, "Wrote file");
                Ok(ToolResult::success(format!(
                    "wrote {chars} characters to '{path}'."
                )))
            }
            Err(e) => Ok(ToolResult::failure(format!("error writing file '{path}': {e}"))),
        }
    }
}
