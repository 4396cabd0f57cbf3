//! Fuzz target for the lenient date parser.
//!
//! This fuzzer tests that date parsing:
//! 1. Never panics on any input
//! 2. Only returns dates that format back to a parseable ISO string

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub::rules::parse_date;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        if let Some(date) = parse_date(content) {
            let iso = date.format("%Y-%m-%d").to_string();
            assert_eq!(parse_date(&iso), Some(date));
        }
    }
});
