//! Named summary counters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Counter written when duplicates are removed.
pub const DUPLICATES_REMOVED: &str = "duplicates_removed";
/// Counter written by email normalization.
pub const EMAILS_NORMALIZED: &str = "emails_normalized";
/// Counter written by date normalization.
pub const DATES_NORMALIZED: &str = "dates_normalized";
/// Counter written by phone normalization.
pub const PHONES_NORMALIZED: &str = "phones_normalized";
/// Counter written by whitespace trimming.
pub const WHITESPACE_TRIMMED: &str = "whitespace_trimmed";
/// Counter written by empty-value collapsing.
pub const EMPTY_VALUES_COLLAPSED: &str = "empty_values_collapsed";
/// Row count before any rule ran.
pub const ROWS_BEFORE: &str = "rows_before";
/// Row count after the last rule.
pub const ROWS_AFTER: &str = "rows_after";

/// A counter value produced by a rule stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// Counter name.
    pub name: &'static str,
    /// Counter value.
    pub value: u64,
}

impl Counter {
    /// Create a counter.
    pub fn new(name: &'static str, value: usize) -> Self {
        Self {
            name,
            value: value as u64,
        }
    }
}

/// Ordered counter map. Each counter is written at most once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary {
    counters: IndexMap<String, u64>,
}

impl Summary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a counter. A second write to the same name is ignored.
    ///
    /// Returns false when the counter already existed.
    pub fn record(&mut self, name: &str, value: u64) -> bool {
        if self.counters.contains_key(name) {
            warn!(counter = name, value, "counter already recorded, ignoring");
            return false;
        }
        self.counters.insert(name.to_string(), value);
        true
    }

    /// Read a counter.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    /// Iterate counters in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True when no counter was written.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut summary = Summary::new();
        assert!(summary.record(DUPLICATES_REMOVED, 2));
        assert!(!summary.record(DUPLICATES_REMOVED, 5));
        assert_eq!(summary.get(DUPLICATES_REMOVED), Some(2));
    }

    #[test]
    fn test_preserves_write_order() {
        let mut summary = Summary::new();
        summary.record(ROWS_BEFORE, 3);
        summary.record(EMAILS_NORMALIZED, 1);
        summary.record(ROWS_AFTER, 2);

        let names: Vec<&str> = summary.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec![ROWS_BEFORE, EMAILS_NORMALIZED, ROWS_AFTER]);

        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"rows_before":3,"emails_normalized":1,"rows_after":2}"#);
    }
}
