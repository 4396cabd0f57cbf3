//! Per-cell data-quality issues.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of problem found in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Value in an email column doesn't look like an address.
    InvalidEmail,
    /// Value in a date column couldn't be parsed as a calendar date.
    UnparseableDate,
    /// Value in a phone column didn't parse or isn't a valid number.
    InvalidPhone,
}

impl IssueKind {
    /// Snake-case label, as written in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::InvalidEmail => "invalid_email",
            IssueKind::UnparseableDate => "unparseable_date",
            IssueKind::InvalidPhone => "invalid_phone",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::InvalidEmail => "Invalid email",
            IssueKind::UnparseableDate => "Unparseable date",
            IssueKind::InvalidPhone => "Invalid phone",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offending cell, found by one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Row position in the table the rule ran on.
    pub row: usize,
    /// Column name.
    pub column: String,
    /// What is wrong.
    pub issue: IssueKind,
    /// The offending value, as it stands in the output table.
    pub value: String,
}

impl Issue {
    /// Create a new issue.
    pub fn new(row: usize, column: impl Into<String>, issue: IssueKind, value: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
            issue,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_kind_as_snake_case() {
        let issue = Issue::new(3, "Phone 1", IssueKind::InvalidPhone, "000-000-0000");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["issue"], "invalid_phone");
        assert_eq!(json["row"], 3);
        assert_eq!(json["value"], "000-000-0000");
    }

    #[test]
    fn test_labels_match_serde() {
        for kind in [
            IssueKind::InvalidEmail,
            IssueKind::UnparseableDate,
            IssueKind::InvalidPhone,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.as_str());
        }
    }
}
