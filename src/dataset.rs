//! The dataset store.
//!
//! [`DatasetStore`] owns the ordered records of one annotation session, the
//! cursor selecting the record on screen, and the active
//! [`AnnotationMode`]. It is the only mutable state in the crate and is
//! passed explicitly to whatever drives it.
//!
//! State transitions:
//!
//! ```text
//! Empty --load(valid)--> Ready(cursor = 0)
//! Ready --load(valid)--> Ready(cursor = 0)     full replace
//! *     --load(invalid)--> *                   unchanged, error returned
//! Ready --seek/step--> Ready                   cursor clamped
//! Ready --commit--> Ready                      one record updated
//! ```

use std::path::Path;

use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::{self, ExportBundle},
    mode::AnnotationMode,
    record::Record,
};

/// Annotation progress over the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Records carrying an annotation under the active mode.
    pub annotated: usize,
    /// Total records.
    pub total: usize,
}

impl Progress {
    /// Records still lacking an annotation.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.annotated)
    }

    /// Fraction annotated in `0.0..=1.0`; an empty dataset counts as done.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.annotated as f64 / self.total as f64
        }
    }
}

/// In-memory annotation table with a clamped cursor.
///
/// # Example
///
/// ```
/// use annotator::{AnnotationMode, DatasetStore};
/// use serde_json::json;
///
/// let mut store = DatasetStore::new(AnnotationMode::Judgment);
/// store
///     .load("{\"custom_id\":\"a\"}\n{\"custom_id\":\"b\"}")
///     .unwrap();
/// assert_eq!(store.len(), 2);
///
/// store.step_next();
/// store
///     .commit([("annotation".to_string(), json!("Yes"))].into_iter().collect())
///     .unwrap();
/// assert_eq!(store.export()[1]["annotation"], json!("Yes"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    records: Vec<Record>,
    columns: Vec<String>,
    cursor: usize,
    mode: AnnotationMode,
    source: Option<String>,
}

impl DatasetStore {
    /// Create an empty store for `mode`.
    #[must_use]
    pub fn new(mode: AnnotationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Replace the dataset with the records parsed from JSON Lines text.
    ///
    /// On success the cursor resets to 0 and every record gains the fields
    /// the active mode requires. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] naming the first malformed line.
    pub fn load(&mut self, raw: &str) -> Result<usize> {
        let records = format::parse_json_lines(raw).map_err(|e| {
            tracing::warn!(error = %e, "rejected dataset load");
            e
        })?;
        Ok(self.load_records(records))
    }

    /// Replace the dataset with already-parsed records.
    ///
    /// Returns the new record count.
    pub fn load_records(&mut self, mut records: Vec<Record>) -> usize {
        for record in &mut records {
            self.mode.inject_defaults(record);
        }

        self.columns = format::column_union(&records);
        self.records = records;
        self.cursor = 0;
        self.source = None;

        tracing::info!(records = self.records.len(), mode = %self.mode, "loaded dataset");
        self.records.len()
    }

    /// Read and load a JSON Lines file, remembering its file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::Parse`]
    /// if it is malformed. Either way the previous dataset is kept.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = format::read_text(path)?;
        let count = self.load(&text)?;
        self.source = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToString::to_string);
        Ok(count)
    }

    /// Load the built-in single-record example dataset.
    pub fn load_demo(&mut self) -> usize {
        let count = self.load_records(vec![demo_record()]);
        self.source = Some("demo".to_string());
        count
    }

    /// Name of the loaded source, if it came from a file or the demo.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The active annotation mode.
    #[must_use]
    pub fn mode(&self) -> AnnotationMode {
        self.mode
    }

    /// Switch mode, injecting the new mode's defaults into every record.
    ///
    /// Fields of the previous mode are kept.
    pub fn set_mode(&mut self, mode: AnnotationMode) {
        self.mode = mode;
        for record in &mut self.records {
            mode.inject_defaults(record);
        }
        for name in mode.field_names() {
            self.note_column(name);
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record under the cursor.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to `target`, clamped to `0..len()`.
    ///
    /// A no-op on an empty dataset. Returns the resulting index.
    pub fn seek(&mut self, target: i64) -> usize {
        if let Some(last) = self.records.len().checked_sub(1) {
            self.cursor = if target <= 0 {
                0
            } else {
                usize::try_from(target).map_or(last, |t| t.min(last))
            };
        }
        self.cursor
    }

    /// Move the cursor one record back; stays put at index 0.
    pub fn step_prev(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    /// Move the cursor one record forward; stays put at the last index.
    pub fn step_next(&mut self) -> usize {
        if self.cursor + 1 < self.records.len() {
            self.cursor += 1;
        }
        self.cursor
    }

    /// The record under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] if nothing is loaded.
    pub fn current(&self) -> Result<&Record> {
        self.records.get(self.cursor).ok_or(Error::EmptyDataset)
    }

    /// Apply `fields` to the record under the cursor.
    ///
    /// Given fields overwrite or extend the record; all other fields are left
    /// untouched. Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] if nothing is loaded.
    pub fn commit(&mut self, fields: Record) -> Result<()> {
        let cursor = self.cursor;
        let record = self.records.get_mut(cursor).ok_or(Error::EmptyDataset)?;

        let names: Vec<String> = fields.keys().cloned().collect();
        for (name, value) in fields {
            record.insert(name, value);
        }
        for name in &names {
            self.note_column(name);
        }

        tracing::debug!(index = cursor, fields = ?names, "committed annotation");
        Ok(())
    }

    /// Commit a single field value to the record under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] if nothing is loaded.
    pub fn commit_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let mut fields = Record::new();
        fields.insert(name.into(), value.into());
        self.commit(fields)
    }

    /// A snapshot of the full table, detached from the store.
    #[must_use]
    pub fn export(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Borrow all records without copying.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Ordered union of field names across the dataset.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether any record in the dataset has a field called `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Annotation progress under the active mode.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            annotated: self
                .records
                .iter()
                .filter(|r| self.mode.is_annotated(r))
                .count(),
            total: self.records.len(),
        }
    }

    /// Serialize the current table to JSON Lines and CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_bundle(&self) -> Result<ExportBundle> {
        ExportBundle::from_records(&self.records, &self.columns)
    }

    fn note_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }
}

fn demo_record() -> Record {
    crate::record::record_from_pairs([
        (
            "custom_id",
            Value::from("Qwen_QwQ-32B_trial-4_lang_hi-doc_id_65-classification"),
        ),
        (
            "input prompt",
            Value::from(
                "Here is a chain-of-reasoning... <think>So, Jim watches TV for 2 hours... </think>",
            ),
        ),
        ("input", Value::from("(full original JSON/ prompt here)")),
    ])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mode::{BehaviorCounts, ANNOTATION_FIELD, COMMENT_FIELD};

    const TWO: &str =
        "{\"custom_id\":\"a\",\"input\":\"2x=10\"}\n{\"custom_id\":\"b\",\"input\":\"3x=9\"}";

    fn loaded(text: &str) -> DatasetStore {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        store.load(text).unwrap();
        store
    }

    fn fields(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = DatasetStore::new(AnnotationMode::Judgment);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.current_index(), 0);
        assert!(matches!(store.current(), Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_load_resets_cursor_and_counts() {
        let mut store = loaded(TWO);
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_index(), 0);

        store.step_next();
        store.load(TWO).unwrap();
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_load_injects_judgment_defaults() {
        let store = loaded(TWO);
        for record in store.records() {
            assert_eq!(record[ANNOTATION_FIELD], json!(""));
            assert_eq!(record[COMMENT_FIELD], json!(""));
        }
        assert!(store.has_column(ANNOTATION_FIELD));
    }

    #[test]
    fn test_load_injects_behavior_defaults() {
        let mut store = DatasetStore::new(AnnotationMode::BehaviorCounts);
        store.load(TWO).unwrap();
        let record = store.current().unwrap();
        assert_eq!(record["verification"], json!(0));
        assert_eq!(record[COMMENT_FIELD], json!(""));
        assert!(!record.contains_key(ANNOTATION_FIELD));
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut store = loaded(TWO);
        store.step_next();

        let err = store.load("{\"ok\":1}\n{bad json").unwrap_err();
        assert_eq!(err.parse_error_line(), Some(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.current().unwrap()["custom_id"], json!("b"));
    }

    #[test]
    fn test_failed_load_on_empty_store_stays_empty() {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        assert!(store.load("nope").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_seek_clamps() {
        let mut store = loaded("{\"i\":0}\n{\"i\":1}\n{\"i\":2}");
        assert_eq!(store.seek(1), 1);
        assert_eq!(store.seek(99), 2);
        assert_eq!(store.seek(-5), 0);
        assert_eq!(store.seek(i64::MAX), 2);
    }

    #[test]
    fn test_seek_on_empty_is_noop() {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        assert_eq!(store.seek(3), 0);
        assert_eq!(store.step_next(), 0);
        assert_eq!(store.step_prev(), 0);
    }

    #[test]
    fn test_step_at_bounds_is_noop() {
        let mut store = loaded(TWO);
        assert_eq!(store.step_prev(), 0);
        assert_eq!(store.step_next(), 1);
        assert_eq!(store.step_next(), 1);
    }

    #[test]
    fn test_commit_only_touches_current_record() {
        let mut store = loaded(TWO);
        let before = store.export();

        store
            .commit(fields(&[(ANNOTATION_FIELD, json!("Yes"))]))
            .unwrap();
        let after = store.export();

        assert_eq!(after[0][ANNOTATION_FIELD], json!("Yes"));
        assert_eq!(after[0]["input"], before[0]["input"]);
        assert_eq!(after[0][COMMENT_FIELD], before[0][COMMENT_FIELD]);
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn test_commit_on_empty_fails() {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        let err = store.commit(fields(&[(ANNOTATION_FIELD, json!("No"))]));
        assert!(matches!(err, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_commit_new_field_extends_columns() {
        let mut store = loaded(TWO);
        store.commit_field("reviewer", "kim").unwrap();
        assert!(store.has_column("reviewer"));
        assert_eq!(store.columns().last().map(String::as_str), Some("reviewer"));
    }

    #[test]
    fn test_export_is_detached_snapshot() {
        let mut store = loaded(TWO);
        let snapshot = store.export();
        store.commit_field(ANNOTATION_FIELD, "No").unwrap();
        assert_eq!(snapshot[0][ANNOTATION_FIELD], json!(""));
    }

    #[test]
    fn test_end_to_end_example() {
        let mut store = loaded(TWO);
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_index(), 0);

        store
            .commit(fields(&[
                (ANNOTATION_FIELD, json!("No")),
                (COMMENT_FIELD, json!("clear")),
            ]))
            .unwrap();
        store.step_next();
        store
            .commit(fields(&[(ANNOTATION_FIELD, json!("Yes"))]))
            .unwrap();

        let bundle = store.export_bundle().unwrap();
        let lines: Vec<&str> = bundle.jsonl.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"custom_id":"a","input":"2x=10","annotation":"No","annotator_comment":"clear"}"#
        );
        assert_eq!(
            lines[1],
            r#"{"custom_id":"b","input":"3x=9","annotation":"Yes","annotator_comment":""}"#
        );
        assert_eq!(
            bundle.table.lines().next(),
            Some("custom_id,input,annotation,annotator_comment")
        );
    }

    #[test]
    fn test_progress_counts_annotated() {
        let mut store = loaded(TWO);
        assert_eq!(store.progress(), Progress { annotated: 0, total: 2 });
        store.commit_field(ANNOTATION_FIELD, "Yes").unwrap();
        let progress = store.progress();
        assert_eq!(progress.annotated, 1);
        assert_eq!(progress.remaining(), 1);
        assert!((progress.ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_behavior_mode() {
        let mut store = DatasetStore::new(AnnotationMode::BehaviorCounts);
        store.load(TWO).unwrap();
        store
            .commit(BehaviorCounts::new(0, 1, 0, 0).to_fields().unwrap())
            .unwrap();
        assert_eq!(store.progress().annotated, 1);
    }

    #[test]
    fn test_progress_with_max_counts() {
        let mut store = DatasetStore::new(AnnotationMode::BehaviorCounts);
        store
            .load(
                "{\"sub_goal_setting\":18446744073709551615,\"verification\":1}\n\
                 {\"text\":\"untouched\"}\n",
            )
            .unwrap();
        assert_eq!(store.progress(), Progress { annotated: 1, total: 2 });
    }

    #[test]
    fn test_set_mode_injects_new_defaults() {
        let mut store = loaded(TWO);
        store.set_mode(AnnotationMode::BehaviorCounts);
        assert_eq!(store.current().unwrap()["backtracking"], json!(0));
        assert!(store.current().unwrap().contains_key(ANNOTATION_FIELD));
        assert!(store.has_column("backward_chaining"));
    }

    #[test]
    fn test_load_demo() {
        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        assert_eq!(store.load_demo(), 1);
        assert_eq!(store.source_name(), Some("demo"));
        assert!(store.has_column("input prompt"));
    }

    #[test]
    fn test_load_file_records_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.jsonl");
        std::fs::write(&path, TWO).unwrap();

        let mut store = DatasetStore::new(AnnotationMode::Judgment);
        assert_eq!(store.load_file(&path).unwrap(), 2);
        assert_eq!(store.source_name(), Some("batch.jsonl"));
    }

    #[test]
    fn test_load_file_missing_keeps_state() {
        let mut store = loaded(TWO);
        assert!(store.load_file("/no/such/file.jsonl").is_err());
        assert_eq!(store.len(), 2);
    }
}
