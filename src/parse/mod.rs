//! Parse phase: lenient document text → JSON tree → typed config.

pub mod config;
pub mod types;

pub use config::{BotConfig, extract_config};
pub use types::*;

use serde_json::{Map, Value};

use crate::error::DefinitionError;

/// Read definition text into a JSON tree.
///
/// Strict JSON is tried first; comments and trailing commas are accepted
/// through the JSON5 reader.
pub fn parse_lenient(text: &str) -> Result<Value, DefinitionError> {
    serde_json::from_str::<Value>(text).or_else(|json_error| {
        json5::from_str::<Value>(text).map_err(|json5_error| {
            tracing::debug!(%json_error, "strict JSON parse failed");
            DefinitionError::Syntax(json5_error.to_string())
        })
    })
}

/// Parse a document and check it has the required top-level shape.
pub fn parse_document(text: &str) -> Result<Map<String, Value>, DefinitionError> {
    match parse_lenient(text)? {
        Value::Object(doc) if doc.get("branches").is_some_and(Value::is_array) => Ok(doc),
        _ => Err(DefinitionError::MissingBranches),
    }
}
