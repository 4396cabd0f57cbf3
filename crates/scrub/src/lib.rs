//! Scrub: clean and normalize tabular files and produce an audit report.
//!
//! Scrub loads a CSV, TSV or XLSX file, runs a fixed pipeline of cleaning rules
//! over it and records what changed and what looked wrong.
//!
//! # Core Principles
//!
//! - **Never lose data**: values that fail to parse are kept verbatim and reported
//! - **Deterministic**: rules run in a fixed order over one table
//! - **Auditable**: every run yields counters and per-cell issues
//!
//! # Example
//!
//! ```no_run
//! use scrub::{Scrubber, Toggles};
//!
//! let scrubber = Scrubber::new().with_toggles(Toggles::all());
//! let result = scrubber.clean("customers.csv").unwrap();
//!
//! println!("Rows: {}", result.table.row_count());
//! println!("Issues: {}", result.report.issues.len());
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod schema;

mod scrubber;

pub use crate::scrubber::{CleanResult, OutputPaths, Scrubber};
pub use config::{LoaderConfig, Toggles};
pub use error::{Result, ScrubError};
pub use input::{ColumnKind, Inspection, SourceMetadata, Table};
pub use pipeline::run_pipeline;
pub use report::{Issue, IssueKind, Report, ReportFormat};
pub use schema::{ColumnRole, classify};
