//! Input loading, the table abstraction and input inspection.

mod inspect;
mod loader;
mod parser;
mod source;
mod workbook;

pub use inspect::{Inspection, inspect_input};
pub use loader::{InputFormat, load_table};
pub use parser::{DelimitedParser, detect_delimiter};
pub use source::{Cell, ColumnKind, SourceMetadata, Table};
pub use workbook::read_workbook;
