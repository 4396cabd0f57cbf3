//! Fuzz target for the delimited file loader.
//!
//! This fuzzer tests that the CSV/TSV loader:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Always yields rectangular tables

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub::LoaderConfig;
use scrub::input::load_table;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::with_suffix(".csv") {
        if temp_file.write_all(data).is_ok() {
            if let Ok((table, _)) = load_table(temp_file.path(), &LoaderConfig::default()) {
                assert!(table.rows.iter().all(|r| r.len() == table.column_count()));
            }
        }
    }
});
