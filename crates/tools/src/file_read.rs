//! File read tool: read file contents inside the workspace root.

use std::path::PathBuf;

use agentry_core::error::ToolError;
use agentry_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::args;

const NAME: &str = "read_file";
const DEFAULT_MAX_CHARS: u64 = 8000;
/// Longest UTF-8 encoding of one char.
const MAX_CHAR_BYTES: u64 = 4;

pub struct ReadFileTool {
    root_dir: PathBuf,
}

impl ReadFileTool {
    /// All paths are resolved relative to `root_dir`, which must exist.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Read a text file from a safe workspace directory. Input: {\"path\": str, \"max_chars\": int}."
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(NAME, &input)?;
        let path = args::required_str(NAME, args, "path")?;
        let max_chars = args::u64_or(NAME, args, "max_chars", DEFAULT_MAX_CHARS)?;

        let resolved = agentry_security::resolve_in_root(&self.root_dir, path).map_err(|e| {
            ToolError::PermissionDenied {
                tool_name: NAME.into(),
                reason: e.to_string(),
            }
        })?;

        if !resolved.is_file() {
            return Ok(ToolResult::failure(format!("file '{path}' does not exist.")));
        }

        match read_prefix(&resolved, max_chars.saturating_mul(MAX_CHAR_BYTES)).await {
            Ok(bytes) => {
                let (head, _) = args::take_chars(valid_utf8_prefix(&bytes), max_chars as usize);
                Ok(ToolResult::success(head))
            }
            Err(e) => Ok(ToolResult::failure(format!("error reading file '{path}': {e}"))),
        }
    }
}

/// Read at most `limit` bytes from the start of the file.
async fn read_prefix(path: &std::path::Path, limit: u64) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.take(limit).read_to_end(&mut bytes).await?;
    Ok(bytes)
}

/// The longest prefix of `bytes` that is valid UTF-8.
///
/// Covers a char split by the byte limit and binary data after text.
fn valid_utf8_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}
