//! Column classification by name.

mod roles;

pub use roles::{ColumnRole, RoleSet, classify, has_role, is_email_target};
