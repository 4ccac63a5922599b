use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role stored in `employees.role`. Immutable once the employee exists.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
}

impl Role {
    /// Capitalised form used in the sidebar ("Manager").
    pub fn label(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
        }
    }
}
