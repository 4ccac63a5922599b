use serde::{Deserialize, Serialize};

use crate::model::Role;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub employee: Option<String>,
    pub view: Option<String>,
}

impl DashboardQuery {
    /// A blank or non-numeric `employee` means "no selection".
    pub fn employee_id(&self) -> Option<i64> {
        self.employee.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

#[derive(Deserialize)]
pub struct NewGoalForm {
    pub employee: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD`, as sent by a date input
    pub due_date: String,
}

#[derive(Deserialize)]
pub struct GoalStatusForm {
    pub employee: i64,
    pub status: String,
}

#[derive(Deserialize)]
pub struct FeedbackForm {
    pub employee: i64,
    #[serde(default)]
    pub feedback_text: String,
}

#[derive(Deserialize)]
pub struct ReviewForm {
    pub employee: i64,
}

#[derive(Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub description: String,
}

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // email
    pub employee_id: i64,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
