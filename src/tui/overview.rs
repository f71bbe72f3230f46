//! Progress overview table
//!
//! A compact table of the dataset: row index, record id and the annotation
//! fields of the active mode, with the cursor row marked.

use super::format::{display_width, pad_to_width, truncate_string};
use crate::{dataset::DatasetStore, record::display_text};

const ID_COLUMN: &str = "custom_id";
const MAX_COLUMN_WIDTH: usize = 50;
const MIN_COLUMN_WIDTH: usize = 3;

/// Overview table widget over a [`DatasetStore`]
#[derive(Debug, Clone)]
pub struct OverviewTable {
    columns: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
    cursor: usize,
    hidden: usize,
    column_widths: Vec<usize>,
}

impl OverviewTable {
    /// Build the table from the first `max_rows` records of `store`
    ///
    /// `max_width` is the total width available for one rendered line.
    pub fn new(store: &DatasetStore, max_rows: usize, max_width: u16) -> Self {
        let mut columns: Vec<String> = Vec::new();
        if store.has_column(ID_COLUMN) {
            columns.push(ID_COLUMN.to_string());
        }
        columns.extend(store.mode().field_names().into_iter().map(str::to_string));

        let rows: Vec<(usize, Vec<String>)> = store
            .records()
            .iter()
            .take(max_rows)
            .enumerate()
            .map(|(i, record)| {
                let cells = columns
                    .iter()
                    .map(|c| record.get(c).map(display_text).unwrap_or_default())
                    .collect();
                (i, cells)
            })
            .collect();

        let hidden = store.len().saturating_sub(rows.len());
        let column_widths = calculate_column_widths(&columns, &rows, max_width as usize);

        Self {
            columns,
            rows,
            cursor: store.current_index(),
            hidden,
            column_widths,
        }
    }

    /// Column names after the index column
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows shown
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Computed width of each named column
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }

    fn index_width(&self) -> usize {
        let last = self.rows.len().saturating_sub(1);
        last.to_string().len().max(1)
    }

    fn render_header_line(&self) -> String {
        let mut line = format!("  {}", pad_to_width("#", self.index_width()));
        for (name, width) in self.columns.iter().zip(&self.column_widths) {
            line.push(' ');
            line.push_str(&pad_to_width(name, *width));
        }
        line.trim_end().to_string()
    }

    fn render_row_line(&self, index: usize, cells: &[String]) -> String {
        let marker = if index == self.cursor { '>' } else { ' ' };
        let mut line = format!("{marker} {:>w$}", index, w = self.index_width());
        for (cell, width) in cells.iter().zip(&self.column_widths) {
            line.push(' ');
            line.push_str(&pad_to_width(cell, *width));
        }
        line.trim_end().to_string()
    }

    /// Render all lines: header, separator, data rows and a footer when
    /// rows were left out
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        let header = self.render_header_line();
        let rule = "─".repeat(display_width(&header));
        lines.push(header);
        lines.push(rule);
        for (index, cells) in &self.rows {
            lines.push(self.render_row_line(*index, cells));
        }
        if self.hidden > 0 {
            lines.push(format!("... {} more records not shown", self.hidden));
        }
        lines
    }
}

/// Width per column: widest of header and cells, capped, then scaled down
/// to fit `max_width` minus the index column and separators.
fn calculate_column_widths(
    columns: &[String],
    rows: &[(usize, Vec<String>)],
    max_width: usize,
) -> Vec<usize> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| display_width(c).min(MAX_COLUMN_WIDTH))
        .collect();

    for (_, cells) in rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            let cell_width = display_width(&truncate_string(cell, MAX_COLUMN_WIDTH));
            *w = (*w).max(cell_width);
        }
    }

    for w in &mut widths {
        *w = (*w).max(MIN_COLUMN_WIDTH);
    }

    let index_width = rows.len().saturating_sub(1).to_string().len().max(1);
    let fixed = 2 + index_width + columns.len();
    let available = max_width.saturating_sub(fixed);

    let total: usize = widths.iter().sum();
    if total > available && available > 0 {
        #[allow(clippy::cast_precision_loss)]
        let scale = available as f64 / total as f64;
        for w in &mut widths {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let scaled = (*w as f64 * scale) as usize;
            *w = scaled.max(MIN_COLUMN_WIDTH);
        }
    }

    widths
}
