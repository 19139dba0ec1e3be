//! The JSON response protocol spoken in agent mode.
//!
//! The model answers every turn with one JSON object, either
//! `{"tool": "<name>", "tool_input": {...}}` or
//! `{"tool": null, "final_answer": "<text>"}`. [`parse_response`] turns the
//! raw reply into a [`Decision`] so the loop never looks at untyped JSON.

use std::borrow::Cow;

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// What one assistant reply asks the loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Run a tool. `input` is an object unless the model sent some other
    /// truthy value, which tools will reject.
    ToolCall { name: String, input: Value },
    /// Stop and return this text.
    FinalAnswer { text: String },
    /// Not JSON at all.
    Malformed,
    /// JSON, but not something the protocol understands. Returned verbatim.
    Opaque { text: String },
}

/// Classify a raw assistant reply.
///
/// `Opaque` carries the whitespace-trimmed reply, fences included.
pub fn parse_response(reply: &str) -> Decision {
    let raw = reply.trim();
    let body = strip_fences(raw);

    let parsed: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => return Decision::Malformed,
    };

    let Value::Object(object) = parsed else {
        return Decision::Opaque { text: raw.into() };
    };

    let opaque = || Decision::Opaque { text: raw.into() };

    match object.get("tool") {
        None => {
            if let Some(text) = object.get("final_answer").and_then(truthy_text) {
                Decision::FinalAnswer { text }
            } else if let Some(error) = object.get("error") {
                // Model-reported errors are surfaced to the caller as the answer.
                Decision::FinalAnswer {
                    text: value_text(error),
                }
            } else {
                opaque()
            }
        }
        Some(Value::Null) => object
            .get("final_answer")
            .and_then(truthy_text)
            .map(|text| Decision::FinalAnswer { text })
            .unwrap_or_else(opaque),
        Some(tool) => Decision::ToolCall {
            name: value_text(tool),
            input: tool_input(&object),
        },
    }
}

/// Remove a surrounding Markdown code fence, if any.
///
/// The opening line (with any language tag) is dropped, as is the last line
/// when it starts with the fence marker.
pub fn strip_fences(text: &str) -> Cow<'_, str> {
    let text = text.trim();
    if !text.starts_with(FENCE) {
        return Cow::Borrowed(text);
    }

    let mut lines: Vec<&str> = text.lines().skip(1).collect();
    if lines.last().is_some_and(|line| line.trim().starts_with(FENCE)) {
        lines.pop();
    }
    Cow::Owned(lines.join("\n").trim().to_string())
}

/// `tool_input`, with falsy or missing values replaced by an empty object.
fn tool_input(object: &Map<String, Value>) -> Value {
    match object.get("tool_input") {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::Object(Map::new()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    is_truthy(value).then(|| value_text(value))
}

/// Strings as-is, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
