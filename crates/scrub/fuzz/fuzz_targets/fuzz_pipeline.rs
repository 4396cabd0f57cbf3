//! Fuzz target for the full cleaning pipeline.
//!
//! Feeds arbitrary values through every rule and checks that issue rows
//! always point into the cleaned table.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub::input::inspect_input;
use scrub::{SourceMetadata, Table, Toggles, run_pipeline};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        let rows: Vec<[&str; 3]> = content.lines().map(|line| [line, line, line]).collect();
        let table = Table::from_text_rows(["Email", "Signup Date", "Phone"], rows);
        let source = SourceMetadata::in_memory("fuzz", &table);
        let inspection = inspect_input(&table, &source);

        let (cleaned, report) = run_pipeline(table, &Toggles::all(), inspection, &source)
            .expect("default toggles are valid");
        for issue in &report.issues {
            assert!(issue.row < cleaned.row_count());
        }
    }
});
