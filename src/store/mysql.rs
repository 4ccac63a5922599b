use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{
    FromRow, MySql, MySqlPool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    pool::PoolConnection,
};
use tracing::{debug, instrument};

use super::{PerformanceStore, not_awaiting_review, parse_stored};
use crate::auth::password::CredentialPolicy;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::model::{Employee, FeedbackEntry, Goal, GoalStatus, NewGoal, Report, Task, TaskStatus};

#[derive(FromRow)]
struct EmployeeRow {
    employee_id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    manager_id: Option<i64>,
}

#[derive(FromRow)]
struct GoalRow {
    goal_id: i64,
    employee_id: i64,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    status: String,
}

impl TryFrom<GoalRow> for Goal {
    type Error = StoreError;

    fn try_from(row: GoalRow) -> Result<Self, Self::Error> {
        Ok(Goal {
            goal_id: row.goal_id,
            employee_id: row.employee_id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            status: parse_stored("goal status", &row.status)?,
        })
    }
}

#[derive(FromRow)]
struct TaskRow {
    task_id: i64,
    goal_id: i64,
    description: String,
    status: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            task_id: row.task_id,
            goal_id: row.goal_id,
            description: row.description,
            status: parse_stored("task status", &row.status)?,
        })
    }
}

/// MySQL-backed store over a bounded connection pool.
pub struct MySqlStore {
    pool: MySqlPool,
    credentials: CredentialPolicy,
}

impl MySqlStore {
    /// Builds the pool and opens its first connection. Any failure here,
    /// including rejected credentials, is a connection error.
    pub async fn connect(
        config: &DatabaseConfig,
        credentials: CredentialPolicy,
    ) -> Result<Self, StoreError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(StoreError::Connection)?;

        Ok(Self::from_pool(pool, credentials))
    }

    pub fn from_pool(pool: MySqlPool, credentials: CredentialPolicy) -> Self {
        Self { pool, credentials }
    }

    async fn acquire(&self) -> Result<PoolConnection<MySql>, StoreError> {
        self.pool.acquire().await.map_err(StoreError::Connection)
    }
}

#[async_trait]
impl PerformanceStore for MySqlStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    #[instrument(name = "store_authenticate", skip(self, password))]
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT employee_id, name, email, password, role, manager_id
            FROM employees
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
        drop(conn);

        let Some(row) = row else {
            debug!("No employee with that email");
            return Ok(None);
        };

        if !self.credentials.matches(password, &row.password) {
            debug!(employee_id = row.employee_id, "Credential mismatch");
            return Ok(None);
        }

        Ok(Some(Employee {
            employee_id: row.employee_id,
            name: row.name,
            email: row.email,
            role: parse_stored("role", &row.role)?,
            manager_id: row.manager_id,
        }))
    }

    async fn list_reports(&self, manager_id: i64) -> Result<Vec<Report>, StoreError> {
        let mut conn = self.acquire().await?;
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT employee_id, name
            FROM employees
            WHERE manager_id = ?
            ORDER BY name ASC, employee_id ASC
            "#,
        )
        .bind(manager_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(reports)
    }

    async fn list_goals(&self, employee_id: i64) -> Result<Vec<Goal>, StoreError> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, GoalRow>(
            r#"
            SELECT goal_id, employee_id, title, description, due_date, status
            FROM goals
            WHERE employee_id = ?
            ORDER BY due_date ASC, goal_id ASC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(Goal::try_from).collect()
    }

    #[instrument(name = "store_create_goal", skip(self, goal), fields(employee_id = goal.employee_id))]
    async fn create_goal(&self, manager_id: i64, goal: &NewGoal) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO goals (employee_id, title, description, due_date, status)
            SELECT employee_id, ?, ?, ?, ?
            FROM employees
            WHERE employee_id = ?
            AND manager_id = ?
            "#,
        )
        .bind(&goal.title)
        .bind(goal.description.as_deref())
        .bind(goal.due_date)
        .bind(GoalStatus::NotStarted.as_str())
        .bind(goal.employee_id)
        .bind(manager_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotPermitted(format!(
                "Employee {} is not one of your reports",
                goal.employee_id
            )));
        }

        Ok(())
    }

    // The driver connects with CLIENT_FOUND_ROWS, so rows_affected counts
    // matched rows and re-setting the same status still reports 1.
    #[instrument(name = "store_set_goal_status", skip(self))]
    async fn set_goal_status(
        &self,
        manager_id: i64,
        goal_id: i64,
        status: GoalStatus,
    ) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE goals g
            JOIN employees e ON e.employee_id = g.employee_id
            SET g.status = ?
            WHERE g.goal_id = ?
            AND e.manager_id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(goal_id)
        .bind(manager_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotPermitted(format!(
                "Goal {goal_id} does not belong to one of your reports"
            )));
        }

        Ok(())
    }

    async fn list_tasks(&self, goal_id: i64) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT task_id, goal_id, description, status
            FROM tasks
            WHERE goal_id = ?
            ORDER BY task_id ASC
            "#,
        )
        .bind(goal_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    #[instrument(name = "store_create_task", skip(self, description))]
    async fn create_task(
        &self,
        employee_id: i64,
        goal_id: i64,
        description: &str,
    ) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (goal_id, description, status)
            SELECT goal_id, ?, ?
            FROM goals
            WHERE goal_id = ?
            AND employee_id = ?
            "#,
        )
        .bind(description)
        .bind(TaskStatus::Pending.as_str())
        .bind(goal_id)
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotPermitted(format!(
                "Goal {goal_id} is not one of your goals"
            )));
        }

        Ok(())
    }

    #[instrument(name = "store_set_task_status", skip(self))]
    async fn set_task_status(
        &self,
        manager_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE tasks t
            JOIN goals g ON g.goal_id = t.goal_id
            JOIN employees e ON e.employee_id = g.employee_id
            SET t.status = ?
            WHERE t.task_id = ?
            AND e.manager_id = ?
            AND t.status = ?
            "#,
        )
        .bind(status.as_str())
        .bind(task_id)
        .bind(manager_id)
        .bind(TaskStatus::Pending.as_str())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_awaiting_review(task_id));
        }

        Ok(())
    }

    async fn list_feedback(&self, goal_id: i64) -> Result<Vec<FeedbackEntry>, StoreError> {
        let mut conn = self.acquire().await?;
        let feedback = sqlx::query_as::<_, FeedbackEntry>(
            r#"
            SELECT f.feedback_text, f.created_at, e.name AS manager_name
            FROM feedback f
            JOIN employees e ON f.manager_id = e.employee_id
            WHERE f.goal_id = ?
            ORDER BY f.created_at DESC, f.feedback_id DESC
            "#,
        )
        .bind(goal_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(feedback)
    }

    #[instrument(name = "store_create_feedback", skip(self, feedback_text))]
    async fn create_feedback(
        &self,
        goal_id: i64,
        manager_id: i64,
        feedback_text: &str,
    ) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO feedback (goal_id, manager_id, feedback_text)
            SELECT g.goal_id, e.manager_id, ?
            FROM goals g
            JOIN employees e ON e.employee_id = g.employee_id
            WHERE g.goal_id = ?
            AND e.manager_id = ?
            "#,
        )
        .bind(feedback_text)
        .bind(goal_id)
        .bind(manager_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotPermitted(format!(
                "Goal {goal_id} does not belong to one of your reports"
            )));
        }

        Ok(())
    }
}
