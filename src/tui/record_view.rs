//! Record detail view for the record under the cursor
//!
//! Shows the resolved display text, the extracted reasoning span and the
//! current values of the mode's annotation fields.

use super::format::wrap_text;
use crate::{
    dataset::DatasetStore,
    error::Result,
    mode::AnnotationMode,
    projector::{pretty_json, Projection, RecordProjector},
    record::{display_text, Record},
};

/// Record detail view widget
///
/// # Example
///
/// ```
/// use annotator::{AnnotationMode, DatasetStore, RecordProjector};
/// use annotator::tui::RecordView;
///
/// let mut store = DatasetStore::new(AnnotationMode::Judgment);
/// store.load_demo();
/// let view = RecordView::from_store(&store, &RecordProjector::default(), 80).unwrap();
/// assert!(view.render_lines()[0].starts_with("Record 1 / 1 [index 0]"));
/// ```
#[derive(Debug, Clone)]
pub struct RecordView {
    projection: Projection,
    /// Annotation fields: (name, value)
    fields: Vec<(String, String)>,
    custom_id: Option<String>,
    display_width: u16,
}

impl RecordView {
    /// Build the view of one record
    pub fn new(projection: Projection, record: &Record, mode: AnnotationMode, width: u16) -> Self {
        let fields = mode
            .field_names()
            .into_iter()
            .map(|name| {
                let value = record.get(name).map(display_text).unwrap_or_default();
                (name.to_string(), value)
            })
            .collect();

        Self {
            projection,
            fields,
            custom_id: record.get("custom_id").map(display_text),
            display_width: width,
        }
    }

    /// Build the view of the record under the store's cursor
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyDataset`] if nothing is loaded.
    pub fn from_store(store: &DatasetStore, projector: &RecordProjector, width: u16) -> Result<Self> {
        let projection = projector.project_current(store)?;
        let record = store.current()?;
        Ok(Self::new(projection, record, store.mode(), width))
    }

    /// The underlying projection
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Render all lines
    pub fn render_lines(&self) -> Vec<String> {
        let width = self.display_width as usize;
        let wrap_width = width.saturating_sub(2).max(1);
        let mut lines = Vec::new();

        let mut title = format!(
            "Record {} / {} [index {}]",
            self.projection.index + 1,
            self.projection.total,
            self.projection.index
        );
        if let Some(id) = &self.custom_id {
            title.push_str(&format!("  ({id})"));
        }
        lines.push(title);
        lines.push("─".repeat(width.min(80)));

        lines.push("Prompt:".to_string());
        for part in wrap_text(&self.projection.prompt, wrap_width) {
            lines.push(format!("  {part}"));
        }

        lines.push(String::new());
        lines.push("Reasoning:".to_string());
        match &self.projection.reasoning {
            Some(reasoning) => {
                for part in wrap_text(reasoning, wrap_width) {
                    lines.push(format!("  {part}"));
                }
            }
            None => lines.push("  (no reasoning span found)".to_string()),
        }

        lines.push(String::new());
        lines.push("Annotation:".to_string());
        let name_width = self.fields.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (name, value) in &self.fields {
            let shown = if value.is_empty() { "-" } else { value.as_str() };
            lines.push(format!("  {name:<name_width$} : {shown}"));
        }

        lines
    }
}

/// Render a whole record as pretty JSON, wrapped to `width`
pub fn render_raw(record: &Record, width: u16) -> Vec<String> {
    pretty_json(record)
        .lines()
        .flat_map(|line| wrap_text(line, width as usize))
        .collect()
}
