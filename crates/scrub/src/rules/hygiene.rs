//! Text hygiene: whitespace trimming and empty-value collapsing.
//!
//! Both rules only touch text columns; numeric, boolean and datetime columns
//! pass through unchanged.

use crate::input::Table;
use crate::report::summary::{EMPTY_VALUES_COLLAPSED, WHITESPACE_TRIMMED};

use super::{Rule, RuleOutcome};

/// Values (compared after trimming, case-insensitively) that mean "no value".
pub const EMPTY_SYNONYMS: &[&str] = &["", "n/a", "na", "null", "none", "-", "--"];

/// Strip leading and trailing whitespace from every text cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimWhitespace;

impl Rule for TrimWhitespace {
    fn name(&self) -> &'static str {
        "trim_whitespace"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let mut trimmed = 0;
        let kinds = table.kinds.clone();

        for row in &mut table.rows {
            for (cell, kind) in row.iter_mut().zip(&kinds) {
                if !kind.is_text() {
                    continue;
                }
                if let Some(value) = cell {
                    let stripped = value.trim();
                    if stripped.len() != value.len() {
                        *value = stripped.to_string();
                        trimmed += 1;
                    }
                }
            }
        }

        RuleOutcome::new(table).with_counter(WHITESPACE_TRIMMED, trimmed)
    }
}

/// Replace empty-synonym text cells with the missing marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseEmpty;

impl CollapseEmpty {
    /// Returns true if the value is a synonym for "no value".
    pub fn is_empty_synonym(value: &str) -> bool {
        let folded = value.trim().to_lowercase();
        EMPTY_SYNONYMS.contains(&folded.as_str())
    }
}

impl Rule for CollapseEmpty {
    fn name(&self) -> &'static str {
        "collapse_empty"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let mut collapsed = 0;
        let kinds = table.kinds.clone();

        for row in &mut table.rows {
            for (cell, kind) in row.iter_mut().zip(&kinds) {
                if kind.is_text() && cell.as_deref().is_some_and(Self::is_empty_synonym) {
                    *cell = None;
                    collapsed += 1;
                }
            }
        }

        RuleOutcome::new(table).with_counter(EMPTY_VALUES_COLLAPSED, collapsed)
    }
}
