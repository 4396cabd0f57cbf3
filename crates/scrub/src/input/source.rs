//! Table abstraction and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Normalized extension, lower-case with leading dot (".csv", ".xlsx").
    pub ext: String,
    /// Detected format (csv, tsv, xlsx, ...).
    pub format: String,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        ext: String,
        format: String,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            ext,
            format,
            hash,
            size_bytes,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }

    /// Metadata for a table that did not come from a file (tests, in-memory use).
    pub fn in_memory(label: impl Into<String>, table: &Table) -> Self {
        let label = label.into();
        Self {
            file: label.clone(),
            path: PathBuf::from(label),
            ext: String::new(),
            format: "memory".to_string(),
            hash: String::new(),
            size_bytes: 0,
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// Storage type of a column.
///
/// Cells are always held as strings; the kind records what the loader saw,
/// so rules can tell text columns from numbers and native dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Free text.
    #[default]
    Text,
    /// Numeric values.
    Number,
    /// true/false values.
    Boolean,
    /// Native date/time values, stored as `%Y-%m-%d %H:%M:%S`.
    DateTime,
}

impl ColumnKind {
    /// Format used to store `DateTime` cells.
    pub const DATETIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Infer the kind of a column of text values.
    ///
    /// Missing values are ignored. An all-missing column is text.
    pub fn infer<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut seen = false;
        let mut numeric = true;
        let mut boolean = true;

        for value in values.into_iter().flatten() {
            seen = true;
            if numeric && value.parse::<f64>().is_err() {
                numeric = false;
            }
            if boolean
                && !value.eq_ignore_ascii_case("true")
                && !value.eq_ignore_ascii_case("false")
            {
                boolean = false;
            }
            if !numeric && !boolean {
                return ColumnKind::Text;
            }
        }

        if !seen {
            ColumnKind::Text
        } else if numeric {
            ColumnKind::Number
        } else if boolean {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }

    /// Returns true for text columns, the only ones hygiene rules touch.
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnKind::Text)
    }
}

/// A single cell: `None` is the missing marker, distinct from an empty string.
pub type Cell = Option<String>;

/// Parsed tabular data: named, typed columns over ordered rows.
///
/// Rows are identified by position only.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Storage kind of each column.
    pub kinds: Vec<ColumnKind>,
    /// Row data (row-major order). Every row has `headers.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from headers, kinds and rows.
    ///
    /// Rows are padded with missing cells or truncated to the header width.
    pub fn new(headers: Vec<String>, kinds: Vec<ColumnKind>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let mut kinds = kinds;
        kinds.resize(width, ColumnKind::Text);

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self {
            headers,
            kinds,
            rows,
        }
    }

    /// Create an all-text table from string rows. Empty strings stay empty strings.
    pub fn from_text_rows<H, R, V>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = V>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let kinds = vec![ColumnKind::Text; headers.len()];
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| Some(v.into())).collect())
            .collect();
        Self::new(headers, kinds, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column index by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get the storage kind of a column.
    pub fn column_kind(&self, index: usize) -> Option<ColumnKind> {
        self.kinds.get(index).copied()
    }

    /// Change the storage kind of a column.
    pub fn set_column_kind(&mut self, index: usize, kind: ColumnKind) {
        if let Some(k) = self.kinds.get_mut(index) {
            *k = kind;
        }
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value. Missing cells and out-of-range positions yield `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// Replace a cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Get a whole row.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Returns true if any cell holds the missing marker.
    pub fn has_missing(&self) -> bool {
        self.rows.iter().any(|row| row.iter().any(Option::is_none))
    }

    /// Keep only rows whose mask entry is true, preserving order.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut idx = 0;
        self.rows.retain(|_| {
            let k = keep.get(idx).copied().unwrap_or(true);
            idx += 1;
            k
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pads_and_truncates_rows() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![ColumnKind::Text],
            vec![
                vec![Some("1".to_string())],
                vec![
                    Some("1".to_string()),
                    Some("2".to_string()),
                    Some("3".to_string()),
                ],
            ],
        );

        assert_eq!(table.kinds.len(), 2);
        assert_eq!(table.rows[0], vec![Some("1".to_string()), None]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_missing_is_distinct_from_empty() {
        let mut table = Table::from_text_rows(["name"], [[""]]);
        assert_eq!(table.get(0, 0), Some(""));
        assert!(!table.has_missing());

        table.set(0, 0, None);
        assert_eq!(table.get(0, 0), None);
        assert!(table.has_missing());
    }

    #[test]
    fn test_retain_rows_preserves_order() {
        let mut table = Table::from_text_rows(["n"], [["a"], ["b"], ["c"], ["d"]]);
        table.retain_rows(&[true, false, true, false]);
        assert_eq!(table.column_by_name("n").unwrap(), vec![Some("a"), Some("c")]);
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            ColumnKind::infer([Some("1"), Some("2.5"), None]),
            ColumnKind::Number
        );
        assert_eq!(
            ColumnKind::infer([Some("TRUE"), Some("false")]),
            ColumnKind::Boolean
        );
        assert_eq!(
            ColumnKind::infer([Some("1"), Some("abc")]),
            ColumnKind::Text
        );
        assert_eq!(ColumnKind::infer([Some(" 5 ")]), ColumnKind::Text);
        assert_eq!(ColumnKind::infer([None, None]), ColumnKind::Text);
    }
}
