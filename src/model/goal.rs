use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Lifecycle status of a goal, stored verbatim in `goals.status`.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "Not Started")]
    #[strum(serialize = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[strum(serialize = "Completed")]
    Completed,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

impl GoalStatus {
    /// The value written to `goals.status`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: i64,
    pub employee_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: GoalStatus,
}

/// Input for `create_goal`; the status always starts as `Not Started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub employee_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
}
