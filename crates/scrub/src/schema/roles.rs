//! Name-based column roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic role a column plays, decided from its name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Email addresses.
    Email,
    /// Phone numbers.
    Phone,
    /// Calendar dates or timestamps.
    Date,
}

impl ColumnRole {
    /// All roles, in classification order.
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Email, ColumnRole::Phone, ColumnRole::Date];

    /// Lower-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Email => "email",
            ColumnRole::Phone => "phone",
            ColumnRole::Date => "date",
        }
    }

    /// Name fragments that put a column in this role.
    fn markers(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Email => &["email"],
            ColumnRole::Phone => &["phone"],
            ColumnRole::Date => &["date", "dob", "birthday", "created", "updated", "timestamp"],
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of roles one column plays. Small and `Copy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet {
    email: bool,
    phone: bool,
    date: bool,
}

impl RoleSet {
    /// Check membership.
    pub fn contains(&self, role: ColumnRole) -> bool {
        match role {
            ColumnRole::Email => self.email,
            ColumnRole::Phone => self.phone,
            ColumnRole::Date => self.date,
        }
    }

    /// Add a role.
    pub fn insert(&mut self, role: ColumnRole) {
        match role {
            ColumnRole::Email => self.email = true,
            ColumnRole::Phone => self.phone = true,
            ColumnRole::Date => self.date = true,
        }
    }

    /// True when the column plays no known role.
    pub fn is_empty(&self) -> bool {
        !(self.email || self.phone || self.date)
    }

    /// Iterate the roles present.
    pub fn iter(&self) -> impl Iterator<Item = ColumnRole> + '_ {
        ColumnRole::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

/// Column names the email normalize/validate rules operate on.
const EMAIL_TARGETS: &[&str] = &["email", "e-mail", "email_address"];

/// Classify a column by its name.
///
/// Case-insensitive substring match on the trimmed name. Never looks at values.
pub fn classify(name: &str) -> RoleSet {
    let lowered = name.trim().to_lowercase();
    let mut roles = RoleSet::default();
    for role in ColumnRole::ALL {
        if role.markers().iter().any(|m| lowered.contains(m)) {
            roles.insert(role);
        }
    }
    roles
}

/// True when the column belongs to the given role.
pub fn has_role(name: &str, role: ColumnRole) -> bool {
    classify(name).contains(role)
}

/// Narrow email matcher: exact, case-insensitive match against a fixed name list.
///
/// Deliberately separate from [`classify`]: "E-mail" is a target but not in the
/// broad email role, and "secondary_email_note" is the other way around.
pub fn is_email_target(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    EMAIL_TARGETS.contains(&lowered.as_str())
}
