//! JSON snapshot of the item list.
//!
//! The snapshot is a JSON array with one object per item carrying exactly
//! the [`Item`] fields. Reading is lenient: unknown keys are ignored, and an
//! entry that does not decode as an item is skipped with a warning so one
//! bad element cannot cost the user the rest of the board. Only input that
//! is not JSON at all, or not an array, is a failure.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde_json::Value;
use tracing::warn;

use crate::doc::Item;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot must be a JSON array, found {0}")]
    NotAnArray(&'static str),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialize items, in the given order, to a JSON array.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if serialization fails.
pub fn serialize(items: &[Item]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(items)?)
}

/// Parse a snapshot produced by [`serialize`] (or by another host).
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] for malformed JSON and
/// [`SnapshotError::NotAnArray`] when the top level is not an array.
pub fn deserialize(json: &str) -> Result<Vec<Item>, SnapshotError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = value else {
        return Err(SnapshotError::NotAnArray(kind_of(&value)));
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Item>(entry) {
            Ok(item) => items.push(item),
            Err(e) => warn!(index, error = %e, "skipping undecodable snapshot entry"),
        }
    }
    Ok(items)
}
