//! Email normalization and validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{ColumnKind, Table};
use crate::report::summary::EMAILS_NORMALIZED;
use crate::report::{Issue, IssueKind};
use crate::schema::is_email_target;

use super::{CellOutcome, Rule, RuleOutcome, matching_columns, normalize_cells};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Returns true if the value looks like an address: something, `@`, a dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Lowercase and trim values in columns named exactly like an email column.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeEmails;

impl Rule for NormalizeEmails {
    fn name(&self) -> &'static str {
        "normalize_emails"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let columns = matching_columns(&table, is_email_target);
        let (changed, _) = normalize_cells(&mut table, &columns, |raw| {
            CellOutcome::Normalized(raw.trim().to_lowercase())
        });
        for &col in &columns {
            table.set_column_kind(col, ColumnKind::Text);
        }
        RuleOutcome::new(table).with_counter(EMAILS_NORMALIZED, changed)
    }
}

/// Flag values in email columns that don't look like an address. Never modifies cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateEmails;

impl Rule for ValidateEmails {
    fn name(&self) -> &'static str {
        "validate_emails"
    }

    fn apply(&self, table: Table) -> RuleOutcome {
        let columns = matching_columns(&table, is_email_target);
        let mut issues = Vec::new();

        for col in columns {
            let column_name = &table.headers[col];
            for (row, value) in table.column_values(col).enumerate() {
                let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                    continue;
                };
                if !is_valid_email(value) {
                    issues.push(Issue::new(row, column_name.clone(), IssueKind::InvalidEmail, value));
                }
            }
        }

        RuleOutcome::new(table).with_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("alice.johnson@example"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("sp ace@example.com"));
    }

    #[test]
    fn test_normalize_emails_counts_changes() {
        let table = Table::from_text_rows(
            ["Email", "Name"],
            [["  ALICE@Example.com ", "A"], ["bob@example.com", "B"]],
        );
        let outcome = NormalizeEmails.apply(table);

        assert_eq!(outcome.table.get(0, 0), Some("alice@example.com"));
        assert_eq!(outcome.counters[0].name, EMAILS_NORMALIZED);
        assert_eq!(outcome.counters[0].value, 1);
    }

    #[test]
    fn test_normalize_only_exact_email_names() {
        let table = Table::from_text_rows(["Work Email", "E-Mail"], [["X@Y.COM", "X@Y.COM"]]);
        let outcome = NormalizeEmails.apply(table);

        assert_eq!(outcome.table.get(0, 0), Some("X@Y.COM"));
        assert_eq!(outcome.table.get(0, 1), Some("x@y.com"));
    }

    #[test]
    fn test_validate_emails_flags_without_modifying() {
        let mut table = Table::from_text_rows(
            ["email_address"],
            [["alice.johnson@example"], ["ok@example.com"], [" bad "], ["x"]],
        );
        table.set(3, 0, None);
        let outcome = ValidateEmails.apply(table.clone());

        assert_eq!(outcome.table, table);
        assert_eq!(outcome.issues.len(), 2);
        assert_eq!(outcome.issues[0].row, 0);
        assert_eq!(outcome.issues[0].column, "email_address");
        assert_eq!(outcome.issues[0].issue, IssueKind::InvalidEmail);
        assert_eq!(outcome.issues[1].value, "bad");
    }

    #[test]
    fn test_validate_ignores_broad_email_columns() {
        // "secondary_email_note" mentions email but is not an email column.
        let table = Table::from_text_rows(["secondary_email_note"], [["call later"]]);
        assert!(ValidateEmails.apply(table).issues.is_empty());
    }
}
