//! Tabular input for table emission
//!
//! Any rectangular source with ordered, named columns can feed
//! `Document::add_table` by implementing [`TabularData`]. [`DataTable`] is
//! the bundled in-memory implementation.

use std::fmt;

use indexmap::IndexMap;

use crate::utils::error::{DocumentError, DocumentResult};

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value, rendered as the literal `null`
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Infer a value from raw text: empty is null, then integer, float,
    /// boolean, and finally text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
        match trimmed {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => f.write_str(&float_repr(*v)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip text for a float.
///
/// Whole values keep a trailing `.0`; magnitudes from `1e16` up and below
/// `1e-4` switch to exponent form with a signed two-digit exponent
/// (`1e+16`, `2.5e-05`).
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let raw = format!("{:e}", value);
        return match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => raw,
        };
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Rectangular table of named columns and indexable rows
pub trait TabularData {
    /// Column names, in display order
    fn column_names(&self) -> Vec<&str>;

    /// Number of data rows
    fn row_count(&self) -> usize;

    /// Value at `row`, `column`; `None` is rendered like a null
    fn cell(&self, row: usize, column: usize) -> Option<&CellValue>;

    fn column_count(&self) -> usize {
        self.column_names().len()
    }
}

/// In-memory table keyed by column name, preserving column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: IndexMap<String, Vec<CellValue>>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, values)` pairs; all columns must have equal length.
    pub fn from_columns<I, S>(columns: I) -> DocumentResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<CellValue>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Build from a header and row-major values.
    pub fn from_rows<S: Into<String>>(
        header: impl IntoIterator<Item = S>,
        rows: Vec<Vec<CellValue>>,
    ) -> DocumentResult<Self> {
        let names: Vec<String> = header.into_iter().map(Into::into).collect();
        let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(DocumentError::invalid(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            for (col, value) in row.into_iter().enumerate() {
                columns[col].push(value);
            }
        }
        Self::from_columns(names.into_iter().zip(columns))
    }

    /// Append a column. Its length must match the existing columns.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> DocumentResult<()> {
        let name = name.into();
        if let Some(first) = self.columns.values().next() {
            if first.len() != values.len() {
                return Err(DocumentError::invalid(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    first.len()
                )));
            }
        }
        if self.columns.contains_key(&name) {
            return Err(DocumentError::invalid(format!(
                "duplicate column '{}'",
                name
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Values of a column by name
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TabularData for DataTable {
    fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    fn row_count(&self) -> usize {
        self.columns.values().next().map(Vec::len).unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.columns
            .get_index(column)
            .and_then(|(_, values)| values.get(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_values() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer(" 42 "), CellValue::Int(42));
        assert_eq!(CellValue::infer("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::infer("true"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("alpha"), CellValue::Text("alpha".into()));
    }

    #[test]
    fn test_display_values() {
        assert_eq!(CellValue::Null.to_string(), "null");
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
        assert_eq!(CellValue::Float(0.125).to_string(), "0.125");
        assert_eq!(CellValue::Bool(false).to_string(), "False");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
    }

    #[test]
    fn test_float_repr_switches_to_exponent_form() {
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(-1.5e16), "-1.5e+16");
        assert_eq!(float_repr(9999999999999998.0), "9999999999999998.0");
        assert_eq!(float_repr(2.5e-5), "2.5e-05");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(1e100), "1e+100");
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(f64::NAN), "nan");
        assert_eq!(float_repr(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_from_rows_preserves_order() {
        let table = DataTable::from_rows(
            ["zeta", "alpha"],
            vec![
                vec![1.into(), "a".into()],
                vec![2.into(), "b".into()],
            ],
        )
        .unwrap();
        assert_eq!(table.column_names(), vec!["zeta", "alpha"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1), Some(&CellValue::Text("b".into())));
        assert_eq!(table.cell(2, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = DataTable::from_rows(["a", "b"], vec![vec![1.into()]]).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_column_length_mismatch_rejected() {
        let mut table = DataTable::new();
        table.push_column("a", vec![1.into(), 2.into()]).unwrap();
        assert!(table.push_column("b", vec![1.into()]).is_err());
        assert!(table.push_column("a", vec![3.into(), 4.into()]).is_err());
    }

    #[test]
    fn test_option_into_cell() {
        let missing: Option<i64> = None;
        assert_eq!(CellValue::from(missing), CellValue::Null);
        assert_eq!(CellValue::from(Some(7)), CellValue::Int(7));
    }
}
