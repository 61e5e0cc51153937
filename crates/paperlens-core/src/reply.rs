//! Parsing and validation of model replies.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AnalysisError, Result};

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse a reply as untyped JSON.
pub fn parse_json(reply: &str) -> Result<Value> {
    serde_json::from_str(strip_code_fence(reply)).map_err(AnalysisError::ResponseParse)
}

/// Validate an already-parsed value against the schema `T`.
pub fn validate<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))
}

/// Parse a reply as JSON and validate it against the schema `T`.
pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    validate(parse_json(reply)?)
}

/// Check that `translated` has the same structure as `original`.
///
/// Objects must have identical key sets, arrays identical lengths, strings
/// must stay strings and every other scalar must keep its JSON type. On
/// mismatch the error names the path of the first difference.
pub fn check_same_shape(original: &Value, translated: &Value) -> std::result::Result<(), String> {
    shape_at("$", original, translated)
}

fn shape_at(path: &str, original: &Value, translated: &Value) -> std::result::Result<(), String> {
    match (original, translated) {
        (Value::Object(a), Value::Object(b)) => {
            if let Some(missing) = a.keys().find(|k| !b.contains_key(*k)) {
                return Err(format!("{path}: key \"{missing}\" was dropped"));
            }
            if let Some(extra) = b.keys().find(|k| !a.contains_key(*k)) {
                return Err(format!("{path}: unexpected key \"{extra}\""));
            }
            for (key, value) in a {
                shape_at(&format!("{path}.{key}"), value, &b[key])?;
            }
            Ok(())
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Err(format!(
                    "{path}: expected {} elements, found {}",
                    a.len(),
                    b.len()
                ));
            }
            for (i, (x, y)) in a.iter().zip(b).enumerate() {
                shape_at(&format!("{path}[{i}]"), x, y)?;
            }
            Ok(())
        }
        (Value::String(_), Value::String(_))
        | (Value::Null, Value::Null)
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Number(_), Value::Number(_)) => Ok(()),
        _ => Err(format!(
            "{path}: expected {}, found {}",
            kind(original),
            kind(translated)
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
