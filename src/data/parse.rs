//! CSV Parse Module
//! Turns decoded CSV text into a typed Dataset, one sniffed cell at a time.

use std::collections::HashMap;

use thiserror::Error;

use super::{Dataset, Record, Value};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse CSV text into a Dataset.
///
/// The first row is the header and defines the column set; every cell of
/// every following row is type-sniffed independently via [`Value::infer`].
/// A header-only body yields an empty Dataset, not an error. Ragged rows
/// and broken quoting are a [`ParseError`].
pub fn parse_csv(text: &str) -> Result<Dataset, ParseError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut fields = HashMap::with_capacity(columns.len());
        for (column, cell) in columns.iter().zip(row.iter()) {
            fields.insert(column.clone(), Value::infer(cell));
        }
        records.push(Record::new(fields));
    }

    Ok(Dataset::new(columns, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_grid_becomes_numeric_records() {
        let ds = parse_csv("a,b\n1,2\n3,4\n").ok().unwrap_or_default();
        assert_eq!(ds.columns(), ["a", "b"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0, "a"), Some(&Value::Number(1.0)));
        assert_eq!(ds.get(0, "b"), Some(&Value::Number(2.0)));
        assert_eq!(ds.get(1, "a"), Some(&Value::Number(3.0)));
        assert_eq!(ds.get(1, "b"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn mixed_cells_sniff_independently() {
        let ds = parse_csv("flag,label,when\ntrue,hello,2021-06-01\n")
            .ok()
            .unwrap_or_default();
        assert_eq!(ds.get(0, "flag"), Some(&Value::Bool(true)));
        assert_eq!(ds.get(0, "label"), Some(&Value::Text("hello".into())));
        assert!(matches!(ds.get(0, "when"), Some(Value::Timestamp(_))));
    }

    #[test]
    fn header_only_body_is_empty_dataset() {
        let ds = parse_csv("a,b\n").ok().unwrap_or_default();
        assert_eq!(ds.columns(), ["a", "b"]);
        assert!(ds.is_empty());
    }

    #[test]
    fn quoted_cells_keep_embedded_commas() {
        let ds = parse_csv("name,note\nx,\"one, two\"\n").ok().unwrap_or_default();
        assert_eq!(ds.get(0, "note"), Some(&Value::Text("one, two".into())));
    }

    #[test]
    fn empty_cells_are_null() {
        let ds = parse_csv("a,b\n1,\n").ok().unwrap_or_default();
        assert_eq!(ds.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        assert!(parse_csv("a,b\n1,2,3\n").is_err());
    }
}
