//! Cleaning and validation rules.
//!
//! Each rule is a pure stage: it takes the table by value and hands it back
//! with the counters and issues it produced. Rules never see the report; the
//! pipeline merges their outcomes.

pub mod dates;
mod dedupe;
mod email;
mod hygiene;
pub mod phone;

pub use dates::{NormalizeDates, parse_date};
pub use dedupe::{Dedupe, dedupe_rows};
pub use email::{NormalizeEmails, ValidateEmails, is_valid_email};
pub use hygiene::{CollapseEmpty, EMPTY_SYNONYMS, TrimWhitespace};
pub use phone::{NormalizePhones, normalize_phone};

use crate::input::Table;
use crate::report::{Counter, Issue, IssueKind};

/// A single pipeline stage.
pub trait Rule {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Run the rule over a table.
    fn apply(&self, table: Table) -> RuleOutcome;
}

/// What a rule stage produced.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// The table after the rule ran.
    pub table: Table,
    /// Counters the rule owns.
    pub counters: Vec<Counter>,
    /// Issues raised against the rule's input table.
    pub issues: Vec<Issue>,
}

impl RuleOutcome {
    /// Outcome with no counters or issues.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            counters: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Add a counter.
    pub fn with_counter(mut self, name: &'static str, value: usize) -> Self {
        self.counters.push(Counter::new(name, value));
        self
    }

    /// Add issues.
    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues.extend(issues);
        self
    }
}

/// Result of normalizing one cell.
///
/// Parse failures are values here, not errors: a flagged cell keeps its
/// original value and yields an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// Nothing to do.
    Unchanged,
    /// Replace the cell with this value (counted only if it differs).
    Normalized(String),
    /// Keep the original value and raise an issue.
    Flagged(IssueKind),
}

/// Apply a per-cell normalizer to the non-missing, non-blank cells of some columns.
///
/// Returns the number of cells whose value changed and the issues raised.
pub(crate) fn normalize_cells<F>(table: &mut Table, columns: &[usize], normalize: F) -> (usize, Vec<Issue>)
where
    F: Fn(&str) -> CellOutcome,
{
    let mut changed = 0;
    let mut issues = Vec::new();

    for &col in columns {
        let Some(column_name) = table.headers.get(col).cloned() else {
            continue;
        };

        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            let Some(cell) = row.get_mut(col) else { continue };
            let Some(raw) = cell.as_deref() else { continue };
            if raw.trim().is_empty() {
                continue;
            }

            match normalize(raw) {
                CellOutcome::Unchanged => {}
                CellOutcome::Normalized(value) => {
                    if value != raw {
                        *cell = Some(value);
                        changed += 1;
                    }
                }
                CellOutcome::Flagged(kind) => {
                    issues.push(Issue::new(row_idx, column_name.clone(), kind, raw));
                }
            }
        }
    }

    (changed, issues)
}

/// Indices of the columns whose names satisfy a predicate.
pub(crate) fn matching_columns(table: &Table, predicate: impl Fn(&str) -> bool) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, name)| predicate(name))
        .map(|(idx, _)| idx)
        .collect()
}
