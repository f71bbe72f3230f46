//! JSON Lines codec.
//!
//! One JSON object per line. Blank lines are skipped on input; output has one
//! object per line in dataset order, with non-ASCII text written verbatim.

use serde_json::Value;

use crate::{
    error::{Error, Result},
    record::Record,
};

/// Parse JSON Lines text into records.
///
/// Every non-blank line must hold exactly one JSON object. Parsing is all or
/// nothing: the first bad line aborts with [`Error::Parse`] naming its 1-based
/// line number in `text` (blank lines included in the count).
///
/// # Errors
///
/// Returns [`Error::Parse`] if a line is not valid JSON or is valid JSON but
/// not an object.
pub fn parse_json_lines(text: &str) -> Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .map_err(|e| Error::parse_line(line_no, format!("not valid JSON: {e}")))?;

        match value {
            Value::Object(map) => records.push(map),
            other => {
                return Err(Error::parse_line(
                    line_no,
                    format!("expected a JSON object, found {}", json_kind(&other)),
                ))
            }
        }
    }

    Ok(records)
}

/// Serialize records as JSON Lines.
///
/// Each record becomes one line terminated by `\n`. An empty dataset yields an
/// empty string.
///
/// # Errors
///
/// Returns [`Error::Json`] if a record cannot be serialized.
pub fn serialize_json_lines(records: &[Record]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
