//! The cleaning pipeline: a fixed-order fold of rule stages over one table.

use tracing::{debug, info};

use crate::config::Toggles;
use crate::error::Result;
use crate::input::{Inspection, SourceMetadata, Table};
use crate::report::Report;
use crate::rules::{
    CollapseEmpty, Dedupe, NormalizeDates, NormalizeEmails, NormalizePhones, Rule, TrimWhitespace,
    ValidateEmails,
};

/// Build the rule stages a toggle set selects, in execution order.
///
/// The two hygiene rules always come first. Optional rules follow in a fixed
/// order: dedupe, email normalize, date normalize, phone normalize, email
/// validate.
pub fn build_rules(toggles: &Toggles) -> Result<Vec<Box<dyn Rule>>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(TrimWhitespace), Box::new(CollapseEmpty)];

    if toggles.dedupe {
        rules.push(Box::new(Dedupe::new(toggles.dedupe_key.clone())));
    }
    if toggles.normalize_emails {
        rules.push(Box::new(NormalizeEmails));
    }
    if toggles.normalize_dates {
        rules.push(Box::new(NormalizeDates));
    }
    if toggles.normalize_phones {
        rules.push(Box::new(NormalizePhones::new(&toggles.phone_region)?));
    }
    if toggles.validate_emails {
        rules.push(Box::new(ValidateEmails));
    }

    Ok(rules)
}

/// Run every selected rule over the table and return it with the finalized report.
///
/// Configuration problems (an unknown phone region) fail before any rule runs.
/// Per-cell problems never fail the run; they end up as report issues.
pub fn run_pipeline(
    table: Table,
    toggles: &Toggles,
    inspection: Inspection,
    source: &SourceMetadata,
) -> Result<(Table, Report)> {
    toggles.validate()?;
    let rules = build_rules(toggles)?;

    let mut report = Report::new(source, inspection, toggles.clone());
    let rows_before = table.row_count();

    let mut table = table;
    for rule in &rules {
        let outcome = rule.apply(table);
        debug!(
            rule = rule.name(),
            rows = outcome.table.row_count(),
            issues = outcome.issues.len(),
            "rule applied"
        );
        report.merge(outcome.counters, outcome.issues);
        table = outcome.table;
    }

    report.finalize(rows_before, table.row_count());
    info!(
        rows_before,
        rows_after = table.row_count(),
        issues = report.issues.len(),
        "pipeline finished"
    );

    Ok((table, report))
}
