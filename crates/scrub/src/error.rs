//! Error types for the scrub library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scrub operations.
///
/// Only load-time and configuration problems are errors. Data-quality
/// findings (bad emails, dates, phones) are reported as issues instead.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Error reading, writing or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading a spreadsheet workbook.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Error writing a spreadsheet workbook.
    #[error("Workbook write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// File extension not supported for reading or writing.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid toggle or loader configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrubError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrubError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for scrub operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = ScrubError::UnsupportedFormat(".parquet".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: .parquet");
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = ScrubError::io(
            "data/missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("data/missing.csv"));
    }
}
