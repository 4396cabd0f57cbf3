//! Report accumulation and the report writer.

mod issue;
mod persistence;
mod report;
pub mod summary;

pub use issue::{Issue, IssueKind};
pub use persistence::ReportFormat;
pub use report::{Report, ReportMeta};
pub use summary::{Counter, Summary};
