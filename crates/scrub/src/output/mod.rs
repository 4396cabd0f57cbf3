//! Table output.

mod atomic;
mod writer;

pub use atomic::{ensure_parent_dir, write_atomically};
pub use writer::{OutputFormat, save_table};
