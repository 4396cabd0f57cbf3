//! Input inspection snapshot taken before any cleaning.

use serde::{Deserialize, Serialize};

use super::source::{SourceMetadata, Table};

/// Shape of the input table as loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Whether any cell holds the missing marker.
    pub has_any_nulls: bool,
    /// Column names in order.
    pub columns: Vec<String>,
    /// Source path.
    pub source: String,
}

/// Take the inspection snapshot of a freshly loaded table.
pub fn inspect_input(table: &Table, source: &SourceMetadata) -> Inspection {
    Inspection {
        rows: table.row_count(),
        cols: table.column_count(),
        has_any_nulls: table.has_missing(),
        columns: table.headers.clone(),
        source: source.path.display().to_string(),
    }
}
