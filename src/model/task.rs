use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

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
    IntoStaticStr,
)]
pub enum TaskStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i64,
    pub goal_id: i64,
    pub description: String,
    pub status: TaskStatus,
}

impl Task {
    /// Only pending tasks can still be approved or rejected.
    pub fn is_reviewable(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

/// A manager's decision on a pending task.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Review {
    Approve,
    Reject,
}

impl From<Review> for TaskStatus {
    fn from(review: Review) -> Self {
        match review {
            Review::Approve => TaskStatus::Approved,
            Review::Reject => TaskStatus::Rejected,
        }
    }
}
