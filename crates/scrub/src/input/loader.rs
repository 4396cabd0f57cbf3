//! Table loader: picks a reader from the file extension.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{Result, ScrubError};

use super::parser::DelimitedParser;
use super::source::{SourceMetadata, Table};
use super::workbook::read_workbook;

/// Input formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated (delimiter still auto-detected unless configured).
    Csv,
    /// Tab-separated.
    Tsv,
    /// Delimited text of unknown flavor.
    Text,
    /// Spreadsheet workbook.
    Xlsx,
}

impl InputFormat {
    /// Map a path's extension to a format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = normalized_extension(path);
        match ext.as_str() {
            ".csv" => Ok(InputFormat::Csv),
            ".tsv" => Ok(InputFormat::Tsv),
            ".txt" => Ok(InputFormat::Text),
            ".xlsx" | ".xls" | ".xlsm" => Ok(InputFormat::Xlsx),
            "" => Err(ScrubError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(ScrubError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Extension recorded in the metadata and used for the cleaned output.
    ///
    /// Legacy workbooks are written back as `.xlsx` and plain text as `.csv`.
    pub fn output_extension(&self, path: &Path) -> String {
        match self {
            InputFormat::Xlsx => ".xlsx".to_string(),
            InputFormat::Text => ".csv".to_string(),
            _ => normalized_extension(path),
        }
    }

    /// Delimiter implied by the format, if any.
    fn delimiter_hint(&self) -> Option<u8> {
        match self {
            InputFormat::Tsv => Some(b'\t'),
            _ => None,
        }
    }
}

/// Lower-case extension with a leading dot, or empty.
fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Load a table from a file and describe where it came from.
///
/// Fails with [`ScrubError::UnsupportedFormat`] before touching the file when
/// the extension is not one of the supported formats.
pub fn load_table(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<(Table, SourceMetadata)> {
    let path = path.as_ref();
    let input_format = InputFormat::from_path(path)?;

    let contents = fs::read(path).map_err(|e| ScrubError::io(path, e))?;
    let size_bytes = contents.len() as u64;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    let (table, format) = match input_format {
        InputFormat::Xlsx => (read_workbook(path)?, "xlsx".to_string()),
        delimited => {
            let parser = DelimitedParser::new(config.clone());
            let delimiter = parser.resolve_delimiter(&contents, delimited.delimiter_hint())?;
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            }
            .to_string();
            (parser.parse_bytes(&contents, delimiter)?, format)
        }
    };

    debug!(
        path = %path.display(),
        format = %format,
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );

    let source = SourceMetadata::new(
        path.to_path_buf(),
        input_format.output_extension(path),
        format,
        hash,
        size_bytes,
        table.row_count(),
        table.column_count(),
    );

    Ok((table, source))
}
