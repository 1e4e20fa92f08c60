//! Response formatting.
//!
//! [`format_tool`] runs a tool operation and wraps whatever comes out into a
//! `CallToolResult`: one text entry holding a YAML document on success, or
//! one `Error: <Kind>: <message>` line with the error flag set on failure.
//! No failure escapes it.

use esa_core::{Error, Result};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;

/// Payload used when an operation produces nothing.
pub const SUCCESS: &str = "success";

/// Shape of a tool's produced value, one normalization rule per variant.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolOutput {
    /// `null`, unit, or an empty string.
    Empty,
    /// A list, passed through as-is.
    Sequence(Vec<Value>),
    /// A mapping that already carries a `status` field.
    TaggedObject(Map<String, Value>),
    /// A mapping without a `status` field.
    PlainObject(Map<String, Value>),
    /// Any other scalar.
    Scalar(Value),
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) if map.contains_key("status") => Self::TaggedObject(map),
            Value::Object(map) => Self::PlainObject(map),
            other => Self::Scalar(other),
        }
    }
}

impl ToolOutput {
    /// Canonical payload for this output.
    pub fn normalize(self) -> Value {
        match self {
            Self::Empty => Value::String(SUCCESS.to_string()),
            Self::Sequence(items) => Value::Array(items),
            Self::TaggedObject(map) => Value::Object(map),
            Self::PlainObject(map) => {
                let mut tagged = Map::with_capacity(map.len() + 1);
                tagged.insert("status".to_string(), Value::String(SUCCESS.to_string()));
                tagged.extend(map);
                Value::Object(tagged)
            }
            Self::Scalar(value) => value,
        }
    }
}

/// Render a payload as a YAML document.
pub fn render(value: &Value) -> Result<String> {
    yaml_serde::to_string(value).map_err(|e| Error::serialization(e.to_string()))
}

/// Normalize and render any serializable value.
pub fn to_text<T: Serialize>(value: T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    render(&ToolOutput::from(value).normalize())
}

/// Text of the error envelope for `err`.
pub fn error_text(err: &Error) -> String {
    format!("Error: {}: {err}", err.kind())
}

/// Error envelope for a failed call of `tool`.
pub fn failure(tool: &str, err: &Error) -> CallToolResult {
    log::warn!("{tool} failed: {}", error_text(err));
    CallToolResult::error(vec![Content::text(error_text(err))])
}

/// Run `operation` and wrap its outcome in a result envelope.
pub async fn format_tool<T, F>(tool: &str, operation: F) -> CallToolResult
where
    T: Serialize,
    F: Future<Output = Result<T>>,
{
    match operation.await.and_then(to_text) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => failure(tool, &err),
    }
}

// ============================================================================
// Tests
// ============================================================================
