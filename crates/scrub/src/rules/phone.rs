//! Phone normalization to E.164.

use phonenumber::country::Id;
use phonenumber::Mode;

use crate::error::{Result, ScrubError};
use crate::input::{ColumnKind, Table};
use crate::report::IssueKind;
use crate::report::summary::PHONES_NORMALIZED;
use crate::schema::{ColumnRole, has_role};

use super::{CellOutcome, Rule, RuleOutcome, matching_columns, normalize_cells};

/// Parse a two-letter region code (case-insensitive).
pub fn parse_region(code: &str) -> Option<Id> {
    code.trim().to_uppercase().parse().ok()
}

/// Parse a phone number against a default region and format it as E.164.
///
/// Returns `None` when the value doesn't parse or isn't a valid number.
pub fn normalize_phone(raw: &str, region: Id) -> Option<String> {
    let number = phonenumber::parse(Some(region), raw).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }
    Some(number.format().mode(Mode::E164).to_string())
}

/// Rewrite valid phone numbers as E.164 and flag the rest.
#[derive(Debug, Clone, Copy)]
pub struct NormalizePhones {
    region: Id,
}

impl NormalizePhones {
    /// Build the rule for a default region code like `"CA"`.
    pub fn new(region: &str) -> Result<Self> {
        let region = parse_region(region)
            .ok_or_else(|| ScrubError::Config(format!("Unknown phone region '{}'", region)))?;
        Ok(Self { region })
    }
}

impl Rule for NormalizePhones {
    fn name(&self) -> &'static str {
        "normalize_phones"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let columns = matching_columns(&table, |name| has_role(name, ColumnRole::Phone));
        let (changed, issues) = normalize_cells(&mut table, &columns, |raw| {
            match normalize_phone(raw, self.region) {
                Some(e164) => CellOutcome::Normalized(e164),
                None => CellOutcome::Flagged(IssueKind::InvalidPhone),
            }
        });
        // E.164 carries a leading '+', so the column can't stay numeric.
        for &col in &columns {
            table.set_column_kind(col, ColumnKind::Text);
        }

        RuleOutcome::new(table)
            .with_counter(PHONES_NORMALIZED, changed)
            .with_issues(issues)
    }
}
