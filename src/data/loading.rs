//! Table loaders for CSV and JSON sources
//!
//! Values are typed with [`CellValue::infer`] for CSV and mapped from JSON
//! scalars directly. Only available with the `data-loading` feature.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::table::{CellValue, DataTable};
use crate::utils::error::{DocumentError, DocumentResult};

impl DataTable {
    /// Read a CSV stream whose first record is the header.
    pub fn from_csv_reader<R: Read>(reader: R) -> DocumentResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let header: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(CellValue::infer).collect());
        }

        DataTable::from_rows(header, rows)
    }

    /// Read a CSV file whose first record is the header.
    pub fn from_csv_path(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Parse a JSON array of flat objects.
    ///
    /// Columns follow the key order of the first record; keys missing from
    /// later records become nulls.
    pub fn from_json_records(json: &str) -> DocumentResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DocumentError::invalid(format!("JSON: {}", e)))?;
        let records = value
            .as_array()
            .ok_or_else(|| DocumentError::invalid("JSON table must be an array of objects"))?;

        let header: Vec<String> = match records.first() {
            Some(Value::Object(first)) => first.keys().cloned().collect(),
            Some(_) => return Err(DocumentError::invalid("JSON records must be objects")),
            None => Vec::new(),
        };

        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                DocumentError::invalid(format!("JSON record {} is not an object", i))
            })?;
            let row = header
                .iter()
                .map(|key| object.get(key).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            rows.push(row);
        }

        DataTable::from_rows(header, rows)
    }
}

fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null),
        },
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn csv_error(err: csv::Error) -> DocumentError {
    DocumentError::invalid(format!("CSV: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::TabularData;

    #[test]
    fn test_csv_infers_types() {
        let csv = "name,count,ratio\nalpha,3,0.5\nbeta,,1.25\n";
        let table = DataTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["name", "count", "ratio"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Int(3)));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Float(1.25)));
    }

    #[test]
    fn test_csv_ragged_record_is_error() {
        let csv = "a,b\n1,2\n3\n";
        assert!(DataTable::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_json_records_keep_key_order() {
        let json = r#"[{"run": 1, "energy": 2.5, "tag": null}, {"run": 2, "tag": "ok"}]"#;
        let table = DataTable::from_json_records(json).unwrap();
        assert_eq!(table.column_names(), vec!["run", "energy", "tag"]);
        assert_eq!(table.cell(0, 2), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Text("ok".into())));
    }

    #[test]
    fn test_json_rejects_non_array() {
        assert!(DataTable::from_json_records(r#"{"a": 1}"#).is_err());
    }
}
