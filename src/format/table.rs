//! Delimited-text (CSV) table export.
//!
//! Records are projected onto a flat, all-text Arrow `RecordBatch` (one
//! nullable `Utf8` column per field) and written with `arrow_csv`, which
//! handles quoting and escaping.

use std::{collections::HashSet, sync::Arc};

use arrow::{
    array::{ArrayRef, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use arrow_csv::WriterBuilder;

use crate::{
    error::{Error, Result},
    record::{cell_text, Record},
};

/// Ordered union of field names across `records`, in first-seen order.
#[must_use]
pub fn column_union(records: &[Record]) -> Vec<String> {
    merge_columns(&[], records)
}

/// `base` followed by every field of `records` not already listed.
fn merge_columns(base: &[String], records: &[Record]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns = Vec::new();
    let names = base
        .iter()
        .map(String::as_str)
        .chain(records.iter().flat_map(|r| r.keys().map(String::as_str)));
    for name in names {
        if seen.insert(name) {
            columns.push(name.to_string());
        }
    }
    columns
}

/// Build the all-text batch backing the table export.
///
/// Missing fields and JSON `null` become null cells.
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the batch cannot be assembled.
pub fn to_record_batch(records: &[Record], columns: &[String]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|name| {
            let cells: Vec<Option<String>> = records
                .iter()
                .map(|record| record.get(name).and_then(cell_text))
                .collect();
            Arc::new(StringArray::from(cells)) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(schema, arrays).map_err(Error::Arrow)
}

/// Serialize records as a CSV table with a header row.
///
/// The column set is `columns` followed by any field found on a record but
/// not listed, so every field of the JSON Lines output appears as a column.
/// Missing values render as empty cells. A dataset with no fields at all
/// serializes to an empty string.
///
/// # Errors
///
/// Returns an error if the batch cannot be built or written.
pub fn serialize_table(records: &[Record], columns: &[String]) -> Result<String> {
    let columns = merge_columns(columns, records);

    if columns.is_empty() {
        return Ok(String::new());
    }

    let batch = to_record_batch(records, &columns)?;

    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer.write(&batch).map_err(Error::Arrow)?;
    let bytes = writer.into_inner();

    String::from_utf8(bytes).map_err(|e| {
        Error::io_no_path(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;

    use super::*;
    use crate::format::jsonl::parse_json_lines;

    fn records(text: &str) -> Vec<Record> {
        parse_json_lines(text).unwrap()
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let recs = records("{\"a\":1,\"b\":2}\n{\"c\":3,\"a\":4}");
        assert_eq!(column_union(&recs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_table_header_and_rows() {
        let recs = records("{\"custom_id\":\"a\",\"n\":1}\n{\"custom_id\":\"b\",\"n\":2}");
        let cols = column_union(&recs);
        let csv = serialize_table(&recs, &cols).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["custom_id,n", "a,1", "b,2"]);
    }

    #[test]
    fn test_table_missing_values_are_empty_cells() {
        let recs = records("{\"a\":\"x\",\"b\":\"y\"}\n{\"a\":\"z\"}\n{\"a\":null,\"b\":\"w\"}");
        let csv = serialize_table(&recs, &column_union(&recs)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["a,b", "x,y", "z,", ",w"]);
    }

    #[test]
    fn test_table_quotes_delimiters() {
        let recs = records("{\"text\":\"one, two\",\"q\":\"say \\\"hi\\\"\"}");
        let csv = serialize_table(&recs, &column_union(&recs)).unwrap();
        assert!(csv.contains("\"one, two\""));
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_table_includes_columns_not_on_any_record() {
        let recs = records("{\"a\":1}");
        let cols = vec!["a".to_string(), "annotation".to_string()];
        let csv = serialize_table(&recs, &cols).unwrap();
        assert!(csv.starts_with("a,annotation\n"));
    }

    #[test]
    fn test_table_adds_fields_missing_from_column_list() {
        let recs = records("{\"a\":1,\"extra\":true}");
        let csv = serialize_table(&recs, &["a".to_string()]).unwrap();
        assert!(csv.starts_with("a,extra\n"));
        assert!(csv.contains("1,true"));
    }

    #[test]
    fn test_table_empty_everything() {
        assert_eq!(serialize_table(&[], &[]).unwrap(), "");
    }

    #[test]
    fn test_record_batch_shape() {
        let recs = records("{\"a\":1,\"b\":[1,2]}\n{\"a\":2}");
        let batch = to_record_batch(&recs, &column_union(&recs)).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 2);
        let b = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(b.value(0), "[1,2]");
        assert!(b.is_null(1));
    }
}
