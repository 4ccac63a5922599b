//! Data access. Every operation runs exactly one statement on a connection
//! acquired for that call and released before it returns; nothing spans
//! operations, so there is no transaction across statements.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Employee, FeedbackEntry, Goal, GoalStatus, NewGoal, Report, Task, TaskStatus};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait PerformanceStore: Send + Sync {
    /// Opens and releases one connection; used by the startup check and `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Exact email match followed by credential verification. A mismatch is
    /// `Ok(None)`, never an error.
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<Option<Employee>, StoreError>;

    async fn list_reports(&self, manager_id: i64) -> Result<Vec<Report>, StoreError>;

    /// Goals of one employee, earliest due date first.
    async fn list_goals(&self, employee_id: i64) -> Result<Vec<Goal>, StoreError>;

    /// Creates a goal for one of `manager_id`'s reports. Anyone else's
    /// employee is `NotPermitted`.
    async fn create_goal(&self, manager_id: i64, goal: &NewGoal) -> Result<(), StoreError>;

    /// Idempotent. Only the managing manager of the goal's owner may set it.
    async fn set_goal_status(
        &self,
        manager_id: i64,
        goal_id: i64,
        status: GoalStatus,
    ) -> Result<(), StoreError>;

    async fn list_tasks(&self, goal_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Logs a pending task on one of `employee_id`'s own goals.
    async fn create_task(
        &self,
        employee_id: i64,
        goal_id: i64,
        description: &str,
    ) -> Result<(), StoreError>;

    /// Moves a pending task to `status`. A task that is already reviewed, or
    /// that belongs to someone else's report, is left alone and reported as
    /// not awaiting review.
    async fn set_task_status(
        &self,
        manager_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), StoreError>;

    /// Feedback on a goal, newest first, with the author's name.
    async fn list_feedback(&self, goal_id: i64) -> Result<Vec<FeedbackEntry>, StoreError>;

    /// Feedback on a goal owned by one of `manager_id`'s reports.
    async fn create_feedback(
        &self,
        goal_id: i64,
        manager_id: i64,
        feedback_text: &str,
    ) -> Result<(), StoreError>;
}

pub(crate) fn not_awaiting_review(task_id: i64) -> StoreError {
    StoreError::Validation(format!("Task {task_id} not found or already reviewed"))
}

/// Parses a stored enumeration value; anything outside the closed set is a
/// validation error rather than being ignored.
pub(crate) fn parse_stored<T: std::str::FromStr>(kind: &str, value: &str) -> Result<T, StoreError> {
    value
        .parse()
        .map_err(|_| StoreError::Validation(format!("Unrecognised {kind} '{value}'")))
}
