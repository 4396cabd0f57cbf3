//! Example: Clean a tabular data file with Scrub.
//!
//! Usage:
//!   cargo run --example clean -- <file_path>
//!
//! Example:
//!   cargo run --example clean -- customers.csv

use std::env;
use std::path::Path;

use scrub::{IssueKind, Scrubber, Toggles};

fn main() -> scrub::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean -- <file_path>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Scrub: {}", file_path);
    println!("{}", separator);
    println!();

    let result = Scrubber::new().with_toggles(Toggles::all()).clean(path)?;

    println!("## Source Metadata");
    println!("  File: {}", result.source.file);
    println!("  Format: {}", result.source.format);
    println!("  Rows: {}", result.source.row_count);
    println!("  Columns: {}", result.source.column_count);
    println!();

    println!("## Summary");
    for (name, value) in result.report.summary.iter() {
        println!("  {}: {}", name, value);
    }
    println!();

    for kind in [IssueKind::InvalidEmail, IssueKind::UnparseableDate, IssueKind::InvalidPhone] {
        let issues: Vec<_> = result.report.issues_of(kind).collect();
        if issues.is_empty() {
            continue;
        }
        println!("## {} ({})", kind.label(), issues.len());
        for issue in issues.iter().take(10) {
            println!("  row {} [{}]: {}", issue.row, issue.column, issue.value);
        }
        println!();
    }

    Ok(())
}
