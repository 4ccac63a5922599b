use serde::{Deserialize, Serialize};

use super::role::Role;

/// An authenticated employee. The stored credential never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub manager_id: Option<i64>,
}

/// An employee reporting to a manager, as listed in the manager's selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub employee_id: i64,
    pub name: String,
}
