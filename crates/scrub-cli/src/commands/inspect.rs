//! Inspect command - show the shape of a file and the role of each column.

use std::path::PathBuf;

use colored::Colorize;
use scrub::{Scrubber, classify};

pub fn run(input: PathBuf, json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let (inspection, source) = Scrubber::new().inspect(&input)?;

    let roles: Vec<(String, Vec<&'static str>)> = inspection
        .columns
        .iter()
        .map(|name| (name.clone(), classify(name).iter().map(|r| r.as_str()).collect()))
        .collect();

    if json_output {
        let columns: Vec<_> = roles
            .iter()
            .map(|(name, roles)| serde_json::json!({ "name": name, "roles": roles }))
            .collect();
        let status = serde_json::json!({
            "file": source.file,
            "format": source.format,
            "hash": source.hash,
            "rows": inspection.rows,
            "cols": inspection.cols,
            "has_any_nulls": inspection.has_any_nulls,
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{} {}", "Inspection of".cyan().bold(), source.file.white());
    println!();
    println!("  Format:  {}", source.format);
    println!("  Rows:    {}", inspection.rows.to_string().white().bold());
    println!("  Columns: {}", inspection.cols.to_string().white().bold());
    println!(
        "  Missing values: {}",
        if inspection.has_any_nulls {
            "yes".yellow()
        } else {
            "no".green()
        }
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for (name, roles) in &roles {
        if roles.is_empty() {
            println!("  {}", name);
        } else {
            println!("  {} {}", name, format!("[{}]", roles.join(", ")).blue());
        }
    }

    Ok(())
}
