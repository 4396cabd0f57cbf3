//! Main Scrubber struct and public API.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::{LoaderConfig, Toggles};
use crate::error::{Result, ScrubError};
use crate::input::{Inspection, SourceMetadata, Table, inspect_input, load_table};
use crate::output::{OutputFormat, save_table};
use crate::pipeline::run_pipeline;
use crate::report::{Report, ReportFormat};

/// Result of cleaning one file.
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// The cleaned table.
    pub table: Table,
    /// The finalized report.
    pub report: Report,
    /// Metadata about the input file.
    pub source: SourceMetadata,
}

/// Where a cleaned table and its report were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Cleaned table (`cleaned_<stem><ext>`).
    pub cleaned: PathBuf,
    /// Report (`report_<stem>.<json|xlsx>`).
    pub report: PathBuf,
}

impl OutputPaths {
    /// Derive both output paths for a source inside `out_dir`.
    pub fn for_source(source: &SourceMetadata, out_dir: &Path, report_format: ReportFormat) -> Self {
        let stem = source
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string());

        Self {
            cleaned: out_dir.join(format!("cleaned_{}{}", stem, source.ext)),
            report: out_dir.join(format!("report_{}.{}", stem, report_format.extension())),
        }
    }
}

/// The cleaning engine: loads a file, runs the pipeline and writes outputs.
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    toggles: Toggles,
    loader: LoaderConfig,
}

impl Scrubber {
    /// Create a scrubber that only runs the always-on hygiene rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select which optional rules run.
    pub fn with_toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Override how delimited files are read.
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// The toggle set in use.
    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    /// Load a file and take its inspection snapshot without cleaning it.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Result<(Inspection, SourceMetadata)> {
        let (table, source) = load_table(path, &self.loader)?;
        let inspection = inspect_input(&table, &source);
        Ok((inspection, source))
    }

    /// Load and clean a file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scrub::{Scrubber, Toggles};
    ///
    /// let scrubber = Scrubber::new().with_toggles(Toggles::all());
    /// let result = scrubber.clean("customers.csv").unwrap();
    ///
    /// println!("Rows after: {}", result.table.row_count());
    /// println!("Issues: {}", result.report.issues.len());
    /// ```
    pub fn clean(&self, path: impl AsRef<Path>) -> Result<CleanResult> {
        // Config errors should fail before the file is read.
        self.toggles.validate()?;

        let (table, source) = load_table(path, &self.loader)?;
        let inspection = inspect_input(&table, &source);
        let (table, report) = run_pipeline(table, &self.toggles, inspection, &source)?;

        Ok(CleanResult {
            table,
            report,
            source,
        })
    }

    /// Write the cleaned table and report into `out_dir`.
    ///
    /// Both destinations are checked before anything is written. If the report
    /// cannot be written the cleaned file is removed again, so either both
    /// outputs exist afterwards or neither does.
    pub fn write_outputs(
        &self,
        result: &CleanResult,
        out_dir: impl AsRef<Path>,
        report_format: ReportFormat,
    ) -> Result<OutputPaths> {
        let out_dir = out_dir.as_ref();
        let paths = OutputPaths::for_source(&result.source, out_dir, report_format);

        OutputFormat::from_path(&paths.cleaned)?;
        ReportFormat::from_path(&paths.report)?;

        fs::create_dir_all(out_dir).map_err(|e| ScrubError::io(out_dir, e))?;

        save_table(&result.table, &paths.cleaned)?;
        if let Err(e) = result.report.save(&paths.report) {
            if let Err(cleanup) = fs::remove_file(&paths.cleaned) {
                warn!(
                    path = %paths.cleaned.display(),
                    error = %cleanup,
                    "could not remove cleaned file after report failure"
                );
            }
            return Err(e);
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_clean_file() {
        let file = csv_file("Email,Name\n A@B.com ,x\na@b.com,x\n");
        let toggles = Toggles {
            normalize_emails: true,
            ..Toggles::default()
        }
        .with_dedupe_key(["Email"]);

        let result = Scrubber::new().with_toggles(toggles).clean(file.path()).unwrap();
        assert_eq!(result.table.row_count(), 1);
        assert_eq!(result.table.get(0, 0), Some("a@b.com"));
        assert_eq!(result.source.ext, ".csv");
        assert!(result.report.meta.source_hash.starts_with("sha256:"));
    }

    #[test]
    fn test_bad_region_fails_before_loading() {
        let toggles = Toggles {
            normalize_phones: true,
            ..Toggles::default().with_phone_region("XX")
        };
        let err = Scrubber::new()
            .with_toggles(toggles)
            .clean("missing.csv")
            .unwrap_err();
        assert!(matches!(err, ScrubError::Config(_)));
    }

    #[test]
    fn test_output_paths() {
        let table = Table::from_text_rows(["a"], [["1"]]);
        let mut source = SourceMetadata::in_memory("data/customers.xls", &table);
        source.ext = ".xlsx".to_string();

        let paths = OutputPaths::for_source(&source, Path::new("out"), ReportFormat::Json);
        assert_eq!(paths.cleaned, PathBuf::from("out/cleaned_customers.xlsx"));
        assert_eq!(paths.report, PathBuf::from("out/report_customers.json"));
    }

    #[test]
    fn test_write_outputs() {
        let file = csv_file("Email\na@b.com\n");
        let scrubber = Scrubber::new();
        let result = scrubber.clean(file.path()).unwrap();

        let out = tempfile::tempdir().unwrap();
        let paths = scrubber
            .write_outputs(&result, out.path().join("nested"), ReportFormat::Xlsx)
            .unwrap();
        assert!(paths.cleaned.exists());
        assert!(paths.report.exists());
    }
}
