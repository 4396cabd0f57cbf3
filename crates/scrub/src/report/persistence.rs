//! Report writer: save reports as JSON documents or multi-sheet workbooks.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ScrubError};
use crate::output::write_atomically;

use super::report::Report;

/// Formats a report can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Pretty-printed JSON document.
    #[default]
    Json,
    /// Workbook with one sheet per section.
    Xlsx,
}

impl ReportFormat {
    /// Map a destination path's extension to a format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(ReportFormat::Json),
            "xlsx" => Ok(ReportFormat::Xlsx),
            "" => Err(ScrubError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(ScrubError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "xlsx" | "excel" => Ok(ReportFormat::Xlsx),
            _ => Err(format!("Unknown report format: {}. Use json or xlsx.", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl Report {
    /// Save the report in the format implied by the destination extension.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use scrub::report::Report;
    /// # fn example(report: &Report) -> scrub::Result<()> {
    /// report.save("out/report_customers.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ReportFormat::from_path(path)?;

        write_atomically(path, |tmp| match format {
            ReportFormat::Json => self.write_json(tmp),
            ReportFormat::Xlsx => self.write_xlsx(tmp),
        })
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ScrubError::io(path, e))?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ScrubError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| ScrubError::io(path, e))?;
        Ok(())
    }

    fn write_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();

        write_key_values(workbook.add_worksheet(), "META", &self.meta)?;
        write_key_values(workbook.add_worksheet(), "INSPECT", &self.inspection)?;
        write_key_values(workbook.add_worksheet(), "TOGGLES", &self.toggles)?;
        write_key_values(workbook.add_worksheet(), "SUMMARY", &self.summary)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name("ISSUES")?;
        for (col, header) in ["row", "column", "issue", "value"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }
        for (idx, issue) in self.issues.iter().enumerate() {
            let row = u32::try_from(idx + 1).map_err(|_| {
                ScrubError::UnsupportedFormat("too many issues for an xlsx report".to_string())
            })?;
            sheet.write_number(row, 0, issue.row as f64)?;
            sheet.write_string(row, 1, &issue.column)?;
            sheet.write_string(row, 2, issue.issue.as_str())?;
            sheet.write_string(row, 3, &issue.value)?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Write a serializable section as a two-column key/value sheet.
fn write_key_values<T: Serialize>(sheet: &mut Worksheet, name: &str, section: &T) -> Result<()> {
    sheet.set_name(name)?;
    sheet.write_string(0, 0, "key")?;
    sheet.write_string(0, 1, "value")?;

    let Value::Object(fields) = serde_json::to_value(section)? else {
        return Ok(());
    };

    for (idx, (key, value)) in fields.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, key)?;
        match value {
            Value::Null => {}
            Value::Bool(b) => {
                sheet.write_boolean(row, 1, *b)?;
            }
            Value::Number(n) => match n.as_f64() {
                Some(f) => {
                    sheet.write_number(row, 1, f)?;
                }
                None => {
                    sheet.write_string(row, 1, n.to_string())?;
                }
            },
            Value::String(s) => {
                sheet.write_string(row, 1, s)?;
            }
            Value::Array(items) => {
                let joined: Vec<String> = items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                sheet.write_string(row, 1, joined.join(", "))?;
            }
            Value::Object(_) => {
                sheet.write_string(row, 1, value.to_string())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Toggles;
    use crate::input::{SourceMetadata, Table, inspect_input};
    use crate::report::{Counter, Issue, IssueKind};

    fn sample_report() -> Report {
        let table = Table::from_text_rows(["Email"], [["bad"]]);
        let source = SourceMetadata::in_memory("people.csv", &table);
        let mut report = Report::new(&source, inspect_input(&table, &source), Toggles::default());
        report.merge(Vec::<Counter>::new(), vec![Issue::new(0, "Email", IssueKind::InvalidEmail, "bad")]);
        report.finalize(1, 1);
        report
    }

    #[test]
    fn test_report_format_from_path() {
        assert_eq!(
            ReportFormat::from_path(Path::new("r.JSON")).unwrap(),
            ReportFormat::Json
        );
        assert!(ReportFormat::from_path(Path::new("r.csv")).is_err());
        assert_eq!("excel".parse::<ReportFormat>().unwrap(), ReportFormat::Xlsx);
    }

    #[test]
    fn test_json_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample_report();
        report.save(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for section in ["meta", "inspection", "toggles", "summary", "issues"] {
            assert!(raw.get(section).is_some(), "missing section {}", section);
        }
        assert_eq!(raw["issues"][0]["issue"], "invalid_email");
        assert_eq!(raw["summary"]["rows_before"], 1);

        let loaded = Report::load(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_xlsx_report_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        sample_report().save(&path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
