//! Helpers for pulling typed arguments out of a tool input object.
//!
//! Models are sloppy about JSON types, so integers and booleans are also
//! accepted in string form ("10", "true").

use agentry_core::error::ToolError;
use serde_json::{Map, Value};

/// The input as an object; anything else is rejected.
pub(crate) fn object<'a>(tool: &str, input: &'a Value) -> Result<&'a Map<String, Value>, ToolError> {
    input.as_object().ok_or_else(|| {
        ToolError::InvalidArguments(format!("{tool}: input must be a JSON object"))
    })
}

/// A non-empty string argument.
pub(crate) fn required_str<'a>(
    tool: &str,
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, ToolError> {
    match args.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ToolError::InvalidArguments(format!("{tool}: '{key}' is required"))),
    }
}

/// An optional string argument; null counts as absent.
pub(crate) fn optional_str<'a>(
    tool: &str,
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "{tool}: '{key}' must be a string"
        ))),
    }
}

/// An optional non-negative integer argument.
pub(crate) fn u64_or(
    tool: &str,
    args: &Map<String, Value>,
    key: &str,
    default: u64,
) -> Result<u64, ToolError> {
    let parsed = match args.get(key) {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| {
        ToolError::InvalidArguments(format!("{tool}: '{key}' must be a non-negative integer"))
    })
}

/// An optional boolean argument.
pub(crate) fn bool_or(
    tool: &str,
    args: &Map<String, Value>,
    key: &str,
    default: bool,
) -> Result<bool, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "{tool}: '{key}' must be a boolean"
        ))),
    }
}

/// The first `max_chars` characters of `text`, and whether anything was cut.
pub(crate) fn take_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}
