//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use scrub::{ReportFormat, Toggles};
use std::path::PathBuf;

/// Scrub: clean and normalize CSV/XLSX files and produce an audit report
#[derive(Parser)]
#[command(name = "scrub")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a file and write the cleaned table plus a report
    Clean {
        /// Path to the input file (.csv, .tsv, .txt, .xlsx, .xls)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,

        /// Report format
        #[arg(long, default_value = "json")]
        report_format: ReportFormat,

        #[command(flatten)]
        toggles: ToggleArgs,
    },

    /// Show the shape of a file and the role of each column
    Inspect {
        /// Path to the input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Pipeline toggles.
#[derive(Args, Debug, Clone)]
pub struct ToggleArgs {
    /// Remove duplicate rows
    #[arg(long)]
    pub dedupe: bool,

    /// Comma-separated column names for the dedupe key
    #[arg(long, default_value = "")]
    pub dedupe_key: String,

    /// Lowercase and trim emails
    #[arg(long)]
    pub normalize_emails: bool,

    /// Parse dates to YYYY-MM-DD where possible
    #[arg(long)]
    pub normalize_dates: bool,

    /// Flag invalid email formats
    #[arg(long)]
    pub validate_emails: bool,

    /// Normalize and validate phone numbers
    #[arg(long)]
    pub normalize_phones: bool,

    /// Default region for phone parsing (e.g. CA, US)
    #[arg(long, default_value = scrub::config::DEFAULT_PHONE_REGION)]
    pub phone_region: String,

    /// Enable every optional rule
    #[arg(long)]
    pub all: bool,
}

impl ToggleArgs {
    /// Build the toggle set for a run.
    pub fn into_toggles(self) -> Toggles {
        let base = if self.all { Toggles::all() } else { Toggles::default() };

        Toggles {
            dedupe: base.dedupe || self.dedupe,
            dedupe_key: Toggles::parse_key_list(&self.dedupe_key),
            normalize_emails: base.normalize_emails || self.normalize_emails,
            normalize_dates: base.normalize_dates || self.normalize_dates,
            validate_emails: base.validate_emails || self.validate_emails,
            normalize_phones: base.normalize_phones || self.normalize_phones,
            phone_region: self.phone_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_flags() {
        let cli = Cli::parse_from([
            "scrub",
            "clean",
            "people.csv",
            "--dedupe",
            "--dedupe-key",
            "Email, Phone",
            "--phone-region",
            "us",
            "--report-format",
            "xlsx",
        ]);

        let Commands::Clean {
            input,
            out_dir,
            report_format,
            toggles,
        } = cli.command
        else {
            panic!("expected clean");
        };
        assert_eq!(input, PathBuf::from("people.csv"));
        assert_eq!(out_dir, PathBuf::from("out"));
        assert_eq!(report_format, ReportFormat::Xlsx);

        let toggles = toggles.into_toggles();
        assert!(toggles.dedupe);
        assert!(!toggles.normalize_emails);
        assert_eq!(toggles.dedupe_key, vec!["Email", "Phone"]);
        assert_eq!(toggles.phone_region, "us");
    }

    #[test]
    fn test_all_flag() {
        let cli = Cli::parse_from(["scrub", "clean", "x.xlsx", "--all", "-v"]);
        assert!(cli.verbose);
        let Commands::Clean { toggles, .. } = cli.command else {
            panic!("expected clean");
        };
        let toggles = toggles.into_toggles();
        assert!(toggles.dedupe && toggles.normalize_phones && toggles.validate_emails);
        assert_eq!(toggles.phone_region, "CA");
    }
}
