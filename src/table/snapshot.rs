//! Point-in-time table snapshots
//!
//! Tables leave the engine as tab-delimited text with one header row. This
//! module parses that text into a [`TableSnapshot`] with one inferred
//! [`ColumnKind`] per column.

use crate::session::{PlantSimError, PlantSimResult};
use crate::types::Value;
use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Inferred type of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every non-empty cell is an integer
    Integer,
    /// Every non-empty cell is a number
    Real,
    /// Every non-empty cell is `true` or `false`
    Boolean,
    /// Anything else, including columns without non-empty cells
    Text,
}

impl ColumnKind {
    /// Infer the kind of a column from its raw cells
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind: Option<ColumnKind> = None;

        for cell in cells.into_iter().map(str::trim).filter(|cell| !cell.is_empty()) {
            let cell_kind = if cell.parse::<i64>().is_ok() {
                ColumnKind::Integer
            } else if Value::parse_finite(cell).is_some() {
                ColumnKind::Real
            } else if cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false") {
                ColumnKind::Boolean
            } else {
                return ColumnKind::Text;
            };

            kind = Some(match (kind, cell_kind) {
                (None, cell_kind) => cell_kind,
                (Some(current), cell_kind) if current == cell_kind => current,
                (Some(ColumnKind::Integer), ColumnKind::Real)
                | (Some(ColumnKind::Real), ColumnKind::Integer) => ColumnKind::Real,
                _ => return ColumnKind::Text,
            });
        }

        kind.unwrap_or(ColumnKind::Text)
    }

    /// Convert a raw cell of this kind into a value
    fn convert(&self, cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }

        match self {
            ColumnKind::Integer => trimmed.parse().map(Value::Integer).unwrap_or_else(|_| Value::from(cell)),
            ColumnKind::Real => trimmed.parse().map(Value::Real).unwrap_or_else(|_| Value::from(cell)),
            ColumnKind::Boolean => Value::Bool(trimmed.eq_ignore_ascii_case("true")),
            ColumnKind::Text => Value::from(cell),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Real => write!(f, "real"),
            ColumnKind::Boolean => write!(f, "boolean"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// Column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unique column name
    pub name: String,
    /// Inferred kind of the column's cells
    pub kind: ColumnKind,
}

/// Point-in-time copy of an engine table
///
/// Snapshots are never written back to the engine. Two snapshots are equal
/// when their columns and cells are equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl TableSnapshot {
    /// Parse tab-delimited text with one header row
    ///
    /// ```rust
    /// use plantsim_remote::table::{ColumnKind, TableSnapshot};
    /// use plantsim_remote::types::Value;
    ///
    /// let snapshot = TableSnapshot::parse("Name\tQty\nGear\t4\nShaft\t\n")?;
    /// assert_eq!(snapshot.column_names(), vec!["Name", "Qty"]);
    /// assert_eq!(snapshot.columns()[1].kind, ColumnKind::Integer);
    /// assert_eq!(snapshot.get(1, "Qty"), Some(&Value::Empty));
    /// # Ok::<(), plantsim_remote::PlantSimError>(())
    /// ```
    pub fn parse(text: &str) -> PlantSimResult<Self> {
        Self::parse_bytes(text.as_bytes())
    }

    /// Read and parse a tab-delimited file
    pub fn from_file(path: impl AsRef<Path>) -> PlantSimResult<Self> {
        let bytes = fs::read(path)?;
        Self::parse_bytes(&bytes)
    }

    /// Parse tab-delimited bytes; invalid UTF-8 is replaced, not rejected
    pub fn parse_bytes(bytes: &[u8]) -> PlantSimResult<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(bytes);

        let mut records = reader.byte_records();
        let header = match records.next() {
            Some(record) => record.map_err(|e| PlantSimError::parse(e.to_string()))?,
            None => return Err(PlantSimError::parse("table file is empty")),
        };
        let names = column_names(&header);

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for record in records {
            let record = record.map_err(|e| PlantSimError::parse(e.to_string()))?;
            if record.len() > names.len() {
                let line = record.position().map(|position| position.line()).unwrap_or_default();
                return Err(PlantSimError::parse(format!(
                    "line {} has {} fields, the header has {}",
                    line,
                    record.len(),
                    names.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(decode).collect();
            row.resize(names.len(), String::new());
            raw_rows.push(row);
        }

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Column {
                name,
                kind: ColumnKind::infer(raw_rows.iter().map(|row| row[index].as_str())),
            })
            .collect();

        let rows = raw_rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&columns)
                    .map(|(cell, column)| column.kind.convert(cell))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column headers, in table order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Cells of the column called `name`, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Rows of cells, in table order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in the column called `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// Pretty-printed JSON of the snapshot
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Unique column names from a header record
///
/// Blank names become `Unnamed: <index>`, repeated names get `.1`, `.2`, ...
fn column_names(header: &ByteRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(header.len());

    for (index, field) in header.iter().enumerate() {
        let raw = decode(field);
        let base = if raw.trim().is_empty() { format!("Unnamed: {}", index) } else { raw };

        let mut name = base.clone();
        let mut suffix = 0;
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{}.{}", base, suffix);
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infers_column_kinds() {
        let snapshot = TableSnapshot::parse(
            "Part\tQty\tWeight\tActive\nGear\t4\t1.5\ttrue\nShaft\t2\t3\tFALSE\n",
        )
        .unwrap();

        let kinds: Vec<ColumnKind> = snapshot.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Text, ColumnKind::Integer, ColumnKind::Real, ColumnKind::Boolean]
        );
        assert_eq!(
            snapshot.rows()[1],
            vec![Value::from("Shaft"), Value::Integer(2), Value::Real(3.0), Value::Bool(false)]
        );
    }

    #[test]
    fn test_mixed_column_is_text() {
        let snapshot = TableSnapshot::parse("Code\n7\nA7\n").unwrap();
        assert_eq!(snapshot.columns()[0].kind, ColumnKind::Text);
        assert_eq!(snapshot.get(0, "Code"), Some(&Value::from("7")));
    }

    #[test]
    fn test_non_finite_names_are_text() {
        let snapshot = TableSnapshot::parse("Name\nNan\nInf\n").unwrap();
        assert_eq!(snapshot.columns()[0].kind, ColumnKind::Text);
        assert_eq!(snapshot.column("Name"), Some(vec![&Value::from("Nan"), &Value::from("Inf")]));
        assert_eq!(snapshot, TableSnapshot::parse("Name\nNan\nInf\n").unwrap());
        assert!(!snapshot.to_json().unwrap().contains("null"));
    }

    #[test]
    fn test_empty_column_is_text() {
        let snapshot = TableSnapshot::parse("A\tB\n1\t\n2\t\n").unwrap();
        assert_eq!(snapshot.columns()[1].kind, ColumnKind::Text);
        assert_eq!(snapshot.column("B"), Some(vec![&Value::Empty, &Value::Empty]));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let snapshot = TableSnapshot::parse("A\tB\tC\n1\n").unwrap();
        assert_eq!(snapshot.rows()[0], vec![Value::Integer(1), Value::Empty, Value::Empty]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let error = TableSnapshot::parse("A\tB\n1\t2\t3\n").unwrap_err();
        assert!(matches!(error, PlantSimError::Parse(_)));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(TableSnapshot::parse(""), Err(PlantSimError::Parse(_))));
    }

    #[test]
    fn test_header_only_table() {
        let snapshot = TableSnapshot::parse("A\tB\n").unwrap();
        assert_eq!(snapshot.column_names(), vec!["A", "B"]);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let snapshot = TableSnapshot::parse("\tX\tX\tX.1\n1\t2\t3\t4\n").unwrap();
        assert_eq!(snapshot.column_names(), vec!["Unnamed: 0", "X", "X.1", "X.1.1"]);
    }

    #[test]
    fn test_quotes_are_kept_verbatim() {
        let snapshot = TableSnapshot::parse("Name\n\"Gear\"\n").unwrap();
        assert_eq!(snapshot.get(0, "Name"), Some(&Value::from("\"Gear\"")));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let snapshot = TableSnapshot::parse_bytes(b"Name\nG\xffar\n").unwrap();
        assert_eq!(snapshot.get(0, "Name"), Some(&Value::from("G\u{fffd}ar")));
    }

    #[test]
    fn test_lookup_misses() {
        let snapshot = TableSnapshot::parse("A\n1\n").unwrap();
        assert_eq!(snapshot.get(1, "A"), None);
        assert_eq!(snapshot.get(0, "B"), None);
        assert_eq!(snapshot.column("B"), None);
    }

    #[test]
    fn test_json_serialization() {
        let snapshot = TableSnapshot::parse("Name\tQty\nGear\t4\n").unwrap();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"Integer\""));

        let parsed: TableSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
