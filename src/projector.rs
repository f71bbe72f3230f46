//! Record projector: picks the text to show for a record.
//!
//! Display text comes from the first candidate key that exists in the
//! dataset's schema (any record having the field counts), read from the
//! record being shown. A reasoning span delimited by markers such as
//! `<think>` / `</think>` can then be pulled out of that text.

use serde_json::Value;

use crate::{
    dataset::DatasetStore,
    error::Result,
    record::{display_text, Record},
};

/// Candidate fields for display text, tried in order.
pub const DEFAULT_DISPLAY_KEYS: [&str; 4] = ["input prompt", "input", "prompt", "text"];
/// Default opening marker of the reasoning span.
pub const DEFAULT_REASONING_START: &str = "<think>";
/// Default closing marker of the reasoning span.
pub const DEFAULT_REASONING_END: &str = "</think>";

/// Resolve the display text of `record`.
///
/// Returns the value of the first key in `fallback_keys` that appears in
/// `schema`. If the record itself lacks that field the result is empty. If
/// no key is in the schema, or the chosen field holds `null`, the whole
/// record is rendered as pretty-printed JSON.
#[must_use]
pub fn resolve_display_text<S: AsRef<str>>(
    record: &Record,
    schema: &[String],
    fallback_keys: &[S],
) -> String {
    let chosen = fallback_keys
        .iter()
        .map(AsRef::as_ref)
        .find(|key| schema.iter().any(|c| c == key));

    match chosen {
        Some(key) => match record.get(key) {
            Some(Value::Null) => pretty_json(record),
            Some(value) => display_text(value),
            None => String::new(),
        },
        None => pretty_json(record),
    }
}

/// The trimmed text strictly between `start_marker` and `end_marker`.
///
/// Uses the first `start_marker`, then the first `end_marker` at or after the
/// end of it. Returns `None` when either marker is missing in that order.
#[must_use]
pub fn extract_delimited_span<'a>(
    text: &'a str,
    start_marker: &str,
    end_marker: &str,
) -> Option<&'a str> {
    let start = text.find(start_marker)? + start_marker.len();
    let len = text[start..].find(end_marker)?;
    Some(text[start..start + len].trim())
}

/// Pretty-printed JSON of a whole record, non-ASCII kept verbatim.
#[must_use]
pub fn pretty_json(record: &Record) -> String {
    serde_json::to_string_pretty(&Value::Object(record.clone())).unwrap_or_default()
}

/// What the presentation layer shows for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Zero-based index of the record.
    pub index: usize,
    /// Total records in the dataset.
    pub total: usize,
    /// Resolved display text.
    pub prompt: String,
    /// Reasoning span extracted from the display text, if delimited.
    pub reasoning: Option<String>,
}

/// Display-text resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordProjector {
    keys: Vec<String>,
    start_marker: String,
    end_marker: String,
}

impl Default for RecordProjector {
    fn default() -> Self {
        Self {
            keys: DEFAULT_DISPLAY_KEYS.iter().map(|k| (*k).to_string()).collect(),
            start_marker: DEFAULT_REASONING_START.to_string(),
            end_marker: DEFAULT_REASONING_END.to_string(),
        }
    }
}

impl RecordProjector {
    /// Create a projector with explicit keys and markers.
    #[must_use]
    pub fn new(
        keys: Vec<String>,
        start_marker: impl Into<String>,
        end_marker: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
        }
    }

    /// Candidate display keys in priority order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Reasoning span markers.
    #[must_use]
    pub fn markers(&self) -> (&str, &str) {
        (&self.start_marker, &self.end_marker)
    }

    /// Project `record` against `schema`.
    #[must_use]
    pub fn project(&self, record: &Record, schema: &[String], index: usize, total: usize) -> Projection {
        let prompt = resolve_display_text(record, schema, &self.keys);
        let reasoning = extract_delimited_span(&prompt, &self.start_marker, &self.end_marker)
            .map(ToString::to_string);
        Projection {
            index,
            total,
            prompt,
            reasoning,
        }
    }

    /// Project the record under the store's cursor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyDataset`] if the store is empty.
    pub fn project_current(&self, store: &DatasetStore) -> Result<Projection> {
        let record = store.current()?;
        Ok(self.project(record, store.columns(), store.current_index(), store.len()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{mode::AnnotationMode, record::record_from_pairs};

    fn schema(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_resolve_first_key_in_schema_wins() {
        let record = record_from_pairs([
            ("input prompt", json!("the prompt")),
            ("input", json!("the input")),
        ]);
        let text = resolve_display_text(
            &record,
            &schema(&["input prompt", "input"]),
            &DEFAULT_DISPLAY_KEYS,
        );
        assert_eq!(text, "the prompt");
    }

    #[test]
    fn test_resolve_falls_through_to_later_key() {
        let record = record_from_pairs([("custom_id", json!("a")), ("text", json!("hello"))]);
        let text = resolve_display_text(&record, &schema(&["custom_id", "text"]), &DEFAULT_DISPLAY_KEYS);
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_resolve_checks_schema_not_record() {
        // "input prompt" exists elsewhere in the dataset, so it is chosen even
        // though this record lacks it.
        let record = record_from_pairs([("input", json!("fallback"))]);
        let text = resolve_display_text(
            &record,
            &schema(&["input prompt", "input"]),
            &DEFAULT_DISPLAY_KEYS,
        );
        assert_eq!(text, "");
    }

    #[test]
    fn test_resolve_null_value_shows_whole_record() {
        let record = record_from_pairs([("input", Value::Null), ("id", json!(7))]);
        let text = resolve_display_text(&record, &schema(&["input", "id"]), &DEFAULT_DISPLAY_KEYS);
        assert_eq!(text, "{\n  \"input\": null,\n  \"id\": 7\n}");
    }

    #[test]
    fn test_resolve_non_string_value() {
        let record = record_from_pairs([("prompt", json!(42))]);
        let text = resolve_display_text(&record, &schema(&["prompt"]), &DEFAULT_DISPLAY_KEYS);
        assert_eq!(text, "42");
    }

    #[test]
    fn test_resolve_falls_back_to_pretty_json() {
        let record = record_from_pairs([("custom_id", json!("a")), ("q", json!("जिम"))]);
        let text = resolve_display_text(&record, &schema(&["custom_id", "q"]), &DEFAULT_DISPLAY_KEYS);
        assert_eq!(text, "{\n  \"custom_id\": \"a\",\n  \"q\": \"जिम\"\n}");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let record = record_from_pairs([("input", json!("x"))]);
        let cols = schema(&["input"]);
        let a = resolve_display_text(&record, &cols, &DEFAULT_DISPLAY_KEYS);
        let b = resolve_display_text(&record, &cols, &DEFAULT_DISPLAY_KEYS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_span() {
        let text = "Here is reasoning <think>  So, Jim watches TV.  </think> done";
        assert_eq!(
            extract_delimited_span(text, "<think>", "</think>"),
            Some("So, Jim watches TV.")
        );
    }

    #[test]
    fn test_extract_span_missing_markers() {
        assert_eq!(extract_delimited_span("no tags", "<think>", "</think>"), None);
        assert_eq!(extract_delimited_span("<think> open", "<think>", "</think>"), None);
        assert_eq!(extract_delimited_span("close </think>", "<think>", "</think>"), None);
    }

    #[test]
    fn test_extract_span_end_before_start() {
        assert_eq!(
            extract_delimited_span("</think> x <think> y", "<think>", "</think>"),
            None
        );
        assert_eq!(
            extract_delimited_span("</think> x <think> y </think>", "<think>", "</think>"),
            Some("y")
        );
    }

    #[test]
    fn test_extract_span_uses_first_occurrences() {
        let text = "<think>a</think><think>b</think>";
        assert_eq!(extract_delimited_span(text, "<think>", "</think>"), Some("a"));
    }

    #[test]
    fn test_extract_span_empty_between() {
        assert_eq!(extract_delimited_span("<think></think>", "<think>", "</think>"), Some(""));
    }

    #[test]
    fn test_project_current() {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        store.load_demo();
        let projection = RecordProjector::default().project_current(&store).unwrap();
        assert_eq!(projection.index, 0);
        assert_eq!(projection.total, 1);
        assert!(projection.prompt.starts_with("Here is a chain-of-reasoning"));
        assert_eq!(
            projection.reasoning.as_deref(),
            Some("So, Jim watches TV for 2 hours...")
        );
    }

    #[test]
    fn test_project_current_empty_store() {
        let store = DatasetStore::new(AnnotationMode::Judgment);
        assert!(RecordProjector::default().project_current(&store).is_err());
    }

    #[test]
    fn test_custom_markers() {
        let projector = RecordProjector::new(vec!["body".to_string()], "[[", "]]");
        let record = record_from_pairs([("body", json!("pre [[ inner ]] post"))]);
        let projection = projector.project(&record, &schema(&["body"]), 0, 1);
        assert_eq!(projection.reasoning.as_deref(), Some("inner"));
        assert_eq!(projector.markers(), ("[[", "]]"));
    }
}
