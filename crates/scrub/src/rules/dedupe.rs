//! Duplicate row removal.

use std::collections::HashSet;

use tracing::warn;

use crate::input::{Cell, Table};
use crate::report::summary::DUPLICATES_REMOVED;
use crate::schema::{ColumnRole, has_role};

use super::{Rule, RuleOutcome};

/// Remove rows that repeat an earlier row's key, keeping the first occurrence.
///
/// With an empty key (or a key naming no existing column) the whole row is
/// the key. Key values are compared after trimming, and email-class key
/// columns are also compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Dedupe {
    key: Vec<String>,
}

impl Dedupe {
    /// Deduplicate on the given key columns.
    pub fn new(key: Vec<String>) -> Self {
        Self { key }
    }

    /// Deduplicate on whole rows.
    pub fn full_row() -> Self {
        Self::default()
    }

    /// Resolve key names to column indices, logging names that don't exist.
    fn key_columns(&self, table: &Table) -> Vec<usize> {
        if self.key.is_empty() {
            return Vec::new();
        }

        let mut columns = Vec::new();
        for name in &self.key {
            match table.column_index(name) {
                Some(idx) if !columns.contains(&idx) => columns.push(idx),
                Some(_) => {}
                None => warn!(column = %name, "dedupe key column not found, ignoring"),
            }
        }

        if columns.is_empty() {
            warn!("no dedupe key column exists, falling back to full-row dedupe");
        }
        columns
    }
}

impl Rule for Dedupe {
    fn name(&self) -> &'static str {
        "dedupe"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let columns = self.key_columns(&table);
        let removed = dedupe_rows(&mut table, &columns);
        RuleOutcome::new(table).with_counter(DUPLICATES_REMOVED, removed)
    }
}

/// Remove duplicate rows in place and return how many were removed.
///
/// An empty `columns` slice means the whole row is the key.
pub fn dedupe_rows(table: &mut Table, columns: &[usize]) -> usize {
    let fold_case: Vec<bool> = columns
        .iter()
        .map(|&idx| {
            table
                .headers
                .get(idx)
                .is_some_and(|name| has_role(name, ColumnRole::Email))
        })
        .collect();

    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table
        .rows
        .iter()
        .map(|row| {
            let key: Vec<Cell> = if columns.is_empty() {
                row.clone()
            } else {
                columns
                    .iter()
                    .zip(&fold_case)
                    .map(|(&idx, &fold)| key_value(row.get(idx).and_then(|c| c.as_deref()), fold))
                    .collect()
            };
            seen.insert(key)
        })
        .collect();

    let before = table.row_count();
    table.retain_rows(&keep);
    before - table.row_count()
}

/// Canonical form of one key cell. Missing stays missing.
fn key_value(value: Option<&str>, fold_case: bool) -> Cell {
    value.map(|v| {
        let trimmed = v.trim();
        if fold_case {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    })
}
