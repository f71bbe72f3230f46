//! Persistence adapter: JSON Lines in, JSON Lines and CSV out.
//!
//! # Example
//!
//! ```
//! use annotator::format::{parse_json_lines, ExportBundle};
//!
//! let records = parse_json_lines("{\"id\":\"a\"}\n{\"id\":\"b\"}").unwrap();
//! let bundle = ExportBundle::from_records(&records, &["id".to_string()]).unwrap();
//! assert_eq!(bundle.jsonl.lines().count(), 2);
//! assert!(bundle.table.starts_with("id\n"));
//! ```

pub mod jsonl;
pub mod table;

use std::path::{Path, PathBuf};

pub use jsonl::{parse_json_lines, serialize_json_lines};
pub use table::{column_union, serialize_table};

use crate::{
    error::{Error, Result},
    record::Record,
};

/// File name of the JSON Lines export.
pub const OUTPUT_JSONL_FILE: &str = "annotated_output.jsonl";
/// File name of the CSV export.
pub const OUTPUT_CSV_FILE: &str = "annotated_output.csv";

/// Both serialized forms of one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// JSON Lines text, one record per line.
    pub jsonl: String,
    /// CSV text with a header row.
    pub table: String,
    /// Number of records serialized.
    pub record_count: usize,
}

/// Where [`ExportBundle::write_to_dir`] put the files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Path of the JSON Lines file.
    pub jsonl: PathBuf,
    /// Path of the CSV file.
    pub csv: PathBuf,
}

impl ExportBundle {
    /// Serialize `records` to both output forms.
    ///
    /// `columns` lists the table columns to emit first; fields found on the
    /// records but missing from it are appended.
    ///
    /// # Errors
    ///
    /// Returns an error if either serialization fails.
    pub fn from_records(records: &[Record], columns: &[String]) -> Result<Self> {
        Ok(Self {
            jsonl: serialize_json_lines(records)?,
            table: serialize_table(records, columns)?,
            record_count: records.len(),
        })
    }

    /// Write both files into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] with the offending path if a write fails.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<OutputPaths> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| Error::io(e, dir))?;

        let paths = OutputPaths {
            jsonl: dir.join(OUTPUT_JSONL_FILE),
            csv: dir.join(OUTPUT_CSV_FILE),
        };

        std::fs::write(&paths.jsonl, &self.jsonl).map_err(|e| Error::io(e, &paths.jsonl))?;
        std::fs::write(&paths.csv, &self.table).map_err(|e| Error::io(e, &paths.csv))?;

        tracing::info!(
            records = self.record_count,
            jsonl = %paths.jsonl.display(),
            csv = %paths.csv.display(),
            "wrote annotated outputs"
        );

        Ok(paths)
    }
}

/// Read a UTF-8 text file, attaching the path to any I/O error.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read or is not UTF-8.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::io(e, path))
}
