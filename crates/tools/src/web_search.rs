//! Web search tool: query a configurable search API over HTTP.
//!
//! The endpoint receives `q` and `num_results` as query parameters. If
//! `SEARCH_API_KEY` is set it is sent as a Bearer token.

use std::time::Duration;

use agentry_core::error::ToolError;
use agentry_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::args;

const NAME: &str = "web_search";
const DEFAULT_NUM_RESULTS: u64 = 5;
const RAW_BODY_LIMIT: usize = 4000;

pub struct WebSearchTool {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Create a search tool; the API key is taken from `SEARCH_API_KEY`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let api_key = std::env::var("SEARCH_API_KEY").ok().filter(|k| !k.is_empty());
        Self::with_api_key(endpoint, api_key)
    }

    pub fn with_api_key(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        }
    }

    /// Render up to `limit` results from a `results` or `data` array.
    fn render_results(query: &str, body: &Value, limit: usize) -> String {
        let results = ["results", "data"]
            .iter()
            .filter_map(|key| body.get(*key).and_then(Value::as_array))
            .find(|arr| !arr.is_empty())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut lines = vec![format!("Search results for: {query}")];
        for (idx, result) in results.iter().take(limit).enumerate() {
            let title = first_str(result, &["title", "name"]).unwrap_or("Untitled");
            lines.push(format!("{}. {title}", idx + 1));
            if let Some(snippet) = first_str(result, &["snippet", "description"]) {
                lines.push(format!("   {snippet}"));
            }
            if let Some(url) = first_str(result, &["url", "link"]) {
                lines.push(format!("   URL: {url}"));
            }
        }
        lines.join("\n")
    }
}

/// The first non-empty string field among `keys`.
fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Perform a live web search. Input: {\"query\": str, \"num_results\": int}. Returns a concise text summary of the top results."
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(NAME, &input)?;
        let query = args::required_str(NAME, args, "query")?;
        let num_results = args::u64_or(NAME, args, "num_results", DEFAULT_NUM_RESULTS)?;

        debug!(query = %query, num_results, "Searching the web");

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.to_string()), ("num_results", num_results.to_string())]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Search API call failed");
                return Ok(ToolResult::failure(format!(
                    "error while calling the search API: {e}"
                )));
            }
        };

        let text = response.text().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason: e.to_string(),
        })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(ToolResult::success(Self::render_results(
                query,
                &body,
                num_results as usize,
            ))),
            Err(_) => Ok(ToolResult::success(args::take_chars(&text, RAW_BODY_LIMIT).0)),
        }
    }
}
