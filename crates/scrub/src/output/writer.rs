//! Table writer: the destination extension picks the format.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::{Result, ScrubError};
use crate::input::{ColumnKind, Table};

use super::atomic::write_atomically;

/// Worksheet name used for cleaned tables.
const CLEANED_SHEET: &str = "cleaned";

/// Output formats the writer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated.
    Csv,
    /// Tab-separated.
    Tsv,
    /// Spreadsheet workbook.
    Xlsx,
}

impl OutputFormat {
    /// Map a destination path's extension to a format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "xlsx" => Ok(OutputFormat::Xlsx),
            "" => Err(ScrubError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(ScrubError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Persist a table in the format implied by `path`.
///
/// The format check happens before anything is created on disk.
pub fn save_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;

    write_atomically(path, |tmp| match format {
        OutputFormat::Csv => write_delimited(table, tmp, b','),
        OutputFormat::Tsv => write_delimited(table, tmp, b'\t'),
        OutputFormat::Xlsx => write_xlsx(table, tmp),
    })?;

    debug!(path = %path.display(), rows = table.row_count(), "saved table");
    Ok(())
}

/// Write delimited text. Missing cells become empty fields.
fn write_delimited(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    writer.flush().map_err(|e| ScrubError::io(path, e))?;
    Ok(())
}

/// Write a single-sheet workbook. Missing cells are left blank.
fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(CLEANED_SHEET)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, xlsx_col(col)?, header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = xlsx_row(row_idx + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let Some(value) = cell else { continue };
            let excel_col = xlsx_col(col)?;
            match table.column_kind(col) {
                Some(ColumnKind::Number) => match value.parse::<f64>() {
                    Ok(n) if n.is_finite() => {
                        sheet.write_number(excel_row, excel_col, n)?;
                    }
                    _ => {
                        sheet.write_string(excel_row, excel_col, value)?;
                    }
                },
                Some(ColumnKind::Boolean) if value.eq_ignore_ascii_case("true") => {
                    sheet.write_boolean(excel_row, excel_col, true)?;
                }
                Some(ColumnKind::Boolean) if value.eq_ignore_ascii_case("false") => {
                    sheet.write_boolean(excel_row, excel_col, false)?;
                }
                _ => {
                    sheet.write_string(excel_row, excel_col, value)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn xlsx_col(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| ScrubError::UnsupportedFormat(format!("column {} is beyond the xlsx limit", col)))
}

fn xlsx_row(row: usize) -> Result<u32> {
    u32::try_from(row)
        .map_err(|_| ScrubError::UnsupportedFormat(format!("row {} is beyond the xlsx limit", row)))
}
