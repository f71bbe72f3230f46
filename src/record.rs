//! Schema-less records.
//!
//! A [`Record`] is one input line: an insertion-ordered map from field name
//! to an arbitrary JSON value. Unknown fields pass through untouched.

use serde_json::Value;

/// One annotatable unit of the dataset.
///
/// Backed by `serde_json::Map` with `preserve_order`, so field order on
/// export matches the order fields were first seen on input.
pub type Record = serde_json::Map<String, Value>;

/// Convert a field value to the text shown in a table cell.
///
/// Returns `None` for JSON `null`, which renders as an empty cell. Strings
/// are emitted verbatim, numbers and booleans in their JSON spelling, and
/// arrays/objects as compact JSON.
#[must_use]
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Convert a field value to display text, rendering `null` as empty.
#[must_use]
pub fn display_text(value: &Value) -> String {
    cell_text(value).unwrap_or_default()
}

/// Build a record from `(name, value)` pairs.
pub fn record_from_pairs<K, I>(pairs: I) -> Record
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
