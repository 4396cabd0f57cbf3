//! Clean command - run the pipeline and write the cleaned file plus report.

use std::path::PathBuf;

use colored::Colorize;
use scrub::{ReportFormat, Scrubber, Toggles};

pub fn run(
    input: PathBuf,
    out_dir: PathBuf,
    toggles: Toggles,
    report_format: ReportFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let scrubber = Scrubber::new().with_toggles(toggles);

    println!("{} {}", "Cleaning".cyan().bold(), input.display().to_string().white());
    if verbose {
        println!("  Toggles: {}", serde_json::to_string(scrubber.toggles())?);
    }

    let result = scrubber.clean(&input)?;
    let paths = scrubber.write_outputs(&result, &out_dir, report_format)?;

    println!();
    println!("Saved cleaned file: {}", paths.cleaned.display().to_string().green());
    println!("Saved report:       {}", paths.report.display().to_string().green());
    println!();

    println!("{}", "Summary:".yellow().bold());
    for (name, value) in result.report.summary.iter() {
        println!("  {:<24} {}", name, value.to_string().white().bold());
    }

    let counts = result.report.issue_counts();
    println!();
    if counts.is_empty() {
        println!("{}", "No issues found.".green());
    } else {
        println!("{}", "Issues:".yellow().bold());
        for (kind, count) in &counts {
            println!("  {:<24} {}", kind.label(), count.to_string().red());
        }
        if verbose {
            println!();
            for issue in result.report.issues.iter().take(20) {
                println!(
                    "  row {:>5}  {:<20} {:<18} {}",
                    issue.row,
                    issue.column,
                    issue.issue.as_str(),
                    issue.value.dimmed()
                );
            }
            if result.report.issues.len() > 20 {
                println!("  ... and {} more (see report)", result.report.issues.len() - 20);
            }
        }
    }

    Ok(())
}
