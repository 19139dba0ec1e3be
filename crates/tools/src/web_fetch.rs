//! Web fetch tool: GET a URL and return the start of the body.

use std::time::Duration;

use agentry_core::error::ToolError;
use agentry_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::args;

const NAME: &str = "web_fetch";
const DEFAULT_MAX_CHARS: u64 = 4000;
const TRUNCATION_MARKER: &str = "\n...[truncated]...";

pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Fetch raw web content from a URL. Input: {\"url\": str, \"max_chars\": int}. Returns the first N characters of the response."
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(NAME, &input)?;
        let url = args::required_str(NAME, args, "url")?;
        let max_chars = args::u64_or(NAME, args, "max_chars", DEFAULT_MAX_CHARS)?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ToolError::InvalidArguments(format!(
                "{NAME}: URL must start with http:// or https://"
            )));
        }

        debug!(url = %url, "Fetching URL");

        let response = match self.client.get(url).send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Fetch failed");
                return Ok(ToolResult::failure(format!(
                    "error while fetching URL: {e}"
                )));
            }
        };

        let body = response.text().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason: e.to_string(),
        })?;

        let (head, truncated) = args::take_chars(&body, max_chars as usize);
        let text = if truncated {
            format!("{head}{TRUNCATION_MARKER}")
        } else {
            head.to_string()
        };
        Ok(ToolResult::success(text))
    }
}
