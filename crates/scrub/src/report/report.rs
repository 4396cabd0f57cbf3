//! The run report: metadata, input snapshot, toggles, counters and issues.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Toggles;
use crate::input::{Inspection, SourceMetadata};

use super::issue::{Issue, IssueKind};
use super::summary::{Counter, ROWS_AFTER, ROWS_BEFORE, Summary};

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// When the report was created (UTC, RFC 3339, whole seconds).
    pub created_utc: String,
    /// Source file path.
    pub source: String,
    /// Hash of the source file contents.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_hash: String,
}

/// Structured audit of one pipeline run.
///
/// Created empty at pipeline start, merged into after each rule stage, and
/// finalized with row counts. Owned by the run that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata.
    pub meta: ReportMeta,
    /// Input snapshot taken before cleaning.
    pub inspection: Inspection,
    /// Toggles the run used.
    pub toggles: Toggles,
    /// Named counters.
    pub summary: Summary,
    /// Per-cell issues, in the order rules raised them.
    pub issues: Vec<Issue>,
}

impl Report {
    /// Start a report for a run.
    pub fn new(source: &SourceMetadata, inspection: Inspection, toggles: Toggles) -> Self {
        Self {
            meta: ReportMeta {
                created_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
                source: source.path.display().to_string(),
                source_hash: source.hash.clone(),
            },
            inspection,
            toggles,
            summary: Summary::new(),
            issues: Vec::new(),
        }
    }

    /// Merge one stage's counters and issues.
    pub fn merge(&mut self, counters: impl IntoIterator<Item = Counter>, issues: Vec<Issue>) {
        for counter in counters {
            self.summary.record(counter.name, counter.value);
        }
        self.issues.extend(issues);
    }

    /// Record the row counts before and after the run.
    pub fn finalize(&mut self, rows_before: usize, rows_after: usize) {
        self.summary.record(ROWS_BEFORE, rows_before as u64);
        self.summary.record(ROWS_AFTER, rows_after as u64);
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.issue == kind)
    }

    /// Number of issues per kind, in first-seen order.
    pub fn issue_counts(&self) -> IndexMap<IssueKind, usize> {
        let mut counts = IndexMap::new();
        for issue in &self.issues {
            *counts.entry(issue.issue).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Table, inspect_input};
    use crate::report::summary::DUPLICATES_REMOVED;

    fn new_report() -> Report {
        let table = Table::from_text_rows(["Email"], [["a@b.com"]]);
        let source = SourceMetadata::in_memory("test.csv", &table);
        let inspection = inspect_input(&table, &source);
        Report::new(&source, inspection, Toggles::default())
    }

    #[test]
    fn test_new_report_is_empty() {
        let report = new_report();
        assert!(report.summary.is_empty());
        assert!(report.issues.is_empty());
        assert_eq!(report.meta.source, "test.csv");
        assert!(report.meta.created_utc.ends_with("+00:00"));
    }

    #[test]
    fn test_merge_and_finalize() {
        let mut report = new_report();
        report.merge(
            [Counter::new(DUPLICATES_REMOVED, 1)],
            vec![
                Issue::new(0, "Email", IssueKind::InvalidEmail, "x"),
                Issue::new(1, "Email", IssueKind::InvalidEmail, "y"),
                Issue::new(0, "Phone", IssueKind::InvalidPhone, "0"),
            ],
        );
        report.finalize(3, 2);

        assert_eq!(report.summary.get(DUPLICATES_REMOVED), Some(1));
        assert_eq!(report.summary.get(ROWS_BEFORE), Some(3));
        assert_eq!(report.summary.get(ROWS_AFTER), Some(2));
        assert_eq!(report.issues_of(IssueKind::InvalidEmail).count(), 2);

        let counts = report.issue_counts();
        assert_eq!(counts.get(&IssueKind::InvalidEmail), Some(&2));
        assert_eq!(counts.get(&IssueKind::InvalidPhone), Some(&1));
        assert_eq!(counts.get(&IssueKind::UnparseableDate), None);
    }
}
