//! Spreadsheet (XLSX/XLS) reader.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};

use crate::error::{Result, ScrubError};

use super::source::{Cell, ColumnKind, Table};

/// What a single workbook cell turned out to be.
#[derive(Debug, Clone, PartialEq)]
enum SheetValue {
    Empty,
    Text(String),
    Number(String),
    Boolean(String),
    DateTime(String),
}

impl SheetValue {
    fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty => SheetValue::Empty,
            Data::String(s) => SheetValue::Text(s.clone()),
            Data::Float(f) => SheetValue::Number(format_number(*f)),
            Data::Int(i) => SheetValue::Number(i.to_string()),
            Data::Bool(b) => SheetValue::Boolean(b.to_string()),
            other => match other.as_datetime() {
                Some(dt) => SheetValue::DateTime(dt.format(ColumnKind::DATETIME_FORMAT).to_string()),
                None => SheetValue::Text(other.to_string()),
            },
        }
    }

    fn kind(&self) -> Option<ColumnKind> {
        match self {
            SheetValue::Empty => None,
            SheetValue::Text(_) => Some(ColumnKind::Text),
            SheetValue::Number(_) => Some(ColumnKind::Number),
            SheetValue::Boolean(_) => Some(ColumnKind::Boolean),
            SheetValue::DateTime(_) => Some(ColumnKind::DateTime),
        }
    }

    fn into_cell(self) -> Cell {
        match self {
            SheetValue::Empty => None,
            SheetValue::Text(s)
            | SheetValue::Number(s)
            | SheetValue::Boolean(s)
            | SheetValue::DateTime(s) => Some(s),
        }
    }
}

/// Render a float the way a spreadsheet shows it: integral values without ".0".
fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Read the first worksheet of a workbook. The first row is the header.
pub fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScrubError::EmptyData("Workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| ScrubError::EmptyData("No header row found".to_string()))?;
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match SheetValue::from_cell(cell).into_cell() {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("Unnamed: {}", i),
        })
        .collect();

    if headers.is_empty() {
        return Err(ScrubError::EmptyData("No columns found".to_string()));
    }

    let values: Vec<Vec<SheetValue>> = rows
        .map(|row| row.iter().map(SheetValue::from_cell).collect())
        .collect();

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_sheet_kind(values.iter().filter_map(|row| row.get(col))))
        .collect();

    let rows: Vec<Vec<Cell>> = values
        .into_iter()
        .map(|row| row.into_iter().map(SheetValue::into_cell).collect())
        .collect();

    Ok(Table::new(headers, kinds, rows))
}

/// A column keeps a native kind only when every non-empty cell agrees.
fn infer_sheet_kind<'a>(cells: impl Iterator<Item = &'a SheetValue>) -> ColumnKind {
    let mut found: Option<ColumnKind> = None;
    for cell in cells {
        match (found, cell.kind()) {
            (_, None) => {}
            (None, Some(kind)) => found = Some(kind),
            (Some(prev), Some(kind)) if prev == kind => {}
            (Some(_), Some(_)) => return ColumnKind::Text,
        }
    }
    found.unwrap_or(ColumnKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5145551000.0), "5145551000");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_infer_sheet_kind() {
        let dates = [
            SheetValue::DateTime("2024-01-02 00:00:00".to_string()),
            SheetValue::Empty,
            SheetValue::DateTime("2024-03-04 00:00:00".to_string()),
        ];
        assert_eq!(infer_sheet_kind(dates.iter()), ColumnKind::DateTime);

        let mixed = [
            SheetValue::Number("1".to_string()),
            SheetValue::Text("x".to_string()),
        ];
        assert_eq!(infer_sheet_kind(mixed.iter()), ColumnKind::Text);

        let empty = [SheetValue::Empty];
        assert_eq!(infer_sheet_kind(empty.iter()), ColumnKind::Text);
    }

    #[test]
    fn test_sheet_value_cells() {
        assert_eq!(SheetValue::from_cell(&Data::Empty).into_cell(), None);
        assert_eq!(
            SheetValue::from_cell(&Data::Int(42)).into_cell(),
            Some("42".to_string())
        );
        assert_eq!(
            SheetValue::from_cell(&Data::String("x".to_string())),
            SheetValue::Text("x".to_string())
        );
    }
}
