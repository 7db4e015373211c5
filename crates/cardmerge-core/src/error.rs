//! Document error types.
//!
//! These classify failures caused by the shape of a JSON document rather
//! than by the filesystem, so callers can tell a bad collection file apart
//! from an unreadable one without string matching.

use thiserror::Error;

/// Errors raised while interpreting a staging or target document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The target document's top level is not a JSON object.
    #[error("target document must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// The configured record field exists but does not hold an array.
    #[error("field `{field}` must be an array of records, found {found}")]
    RecordFieldNotArray { field: String, found: &'static str },
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
