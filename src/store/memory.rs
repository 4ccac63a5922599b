use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::{PerformanceStore, not_awaiting_review};
use crate::auth::password::CredentialPolicy;
use crate::error::StoreError;
use crate::model::{
    Employee, FeedbackEntry, Goal, GoalStatus, NewGoal, Report, Role, Task, TaskStatus,
};

struct StoredEmployee {
    employee: Employee,
    credential: String,
}

struct StoredFeedback {
    feedback_id: i64,
    goal_id: i64,
    manager_id: i64,
    feedback_text: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    employees: Vec<StoredEmployee>,
    goals: Vec<Goal>,
    tasks: Vec<Task>,
    feedback: Vec<StoredFeedback>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn employee(&self, employee_id: i64) -> Option<&Employee> {
        self.employees
            .iter()
            .map(|e| &e.employee)
            .find(|e| e.employee_id == employee_id)
    }

    fn manages(&self, manager_id: i64, employee_id: i64) -> bool {
        self.employee(employee_id)
            .is_some_and(|e| e.manager_id == Some(manager_id))
    }

    /// Index of a goal whose owner reports to `manager_id`.
    fn managed_goal(&self, manager_id: i64, goal_id: i64) -> Option<usize> {
        self.goals
            .iter()
            .position(|g| g.goal_id == goal_id && self.manages(manager_id, g.employee_id))
    }
}

fn foreign_goal(goal_id: i64) -> StoreError {
    StoreError::NotPermitted(format!("Goal {goal_id} does not belong to one of your reports"))
}

/// In-process store with the same ordering, defaults and ownership checks as
/// the MySQL statements. Backs the test suites and local demos.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    credentials: CredentialPolicy,
}

impl MemoryStore {
    pub fn new(credentials: CredentialPolicy) -> Self {
        Self {
            tables: Mutex::default(),
            credentials,
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock poisoned")
    }

    /// Seeds an employee. `credential` is stored as given (hash or plaintext).
    pub fn add_employee(
        &self,
        name: &str,
        email: &str,
        credential: &str,
        role: Role,
        manager_id: Option<i64>,
    ) -> i64 {
        let mut tables = self.tables();
        let employee_id = tables.next_id();
        tables.employees.push(StoredEmployee {
            employee: Employee {
                employee_id,
                name: name.to_string(),
                email: email.to_string(),
                role,
                manager_id,
            },
            credential: credential.to_string(),
        });
        employee_id
    }

    /// Seeds a goal and returns its id.
    pub fn add_goal(&self, employee_id: i64, title: &str, due_date: NaiveDate) -> i64 {
        let mut tables = self.tables();
        let goal_id = tables.next_id();
        tables.goals.push(Goal {
            goal_id,
            employee_id,
            title: title.to_string(),
            description: None,
            due_date,
            status: GoalStatus::default(),
        });
        goal_id
    }

    /// Seeds a pending task and returns its id.
    pub fn add_task(&self, goal_id: i64, description: &str) -> i64 {
        let mut tables = self.tables();
        let task_id = tables.next_id();
        tables.tasks.push(Task {
            task_id,
            goal_id,
            description: description.to_string(),
            status: TaskStatus::default(),
        });
        task_id
    }

    /// Seeds feedback with an explicit creation time.
    pub fn add_feedback_at(
        &self,
        goal_id: i64,
        manager_id: i64,
        feedback_text: &str,
        created_at: DateTime<Utc>,
    ) {
        let mut tables = self.tables();
        let feedback_id = tables.next_id();
        tables.feedback.push(StoredFeedback {
            feedback_id,
            goal_id,
            manager_id,
            feedback_text: feedback_text.to_string(),
            created_at,
        });
    }
}

#[async_trait]
impl PerformanceStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let found = self
            .tables()
            .employees
            .iter()
            .find(|e| e.employee.email == email)
            .map(|e| (e.employee.clone(), e.credential.clone()));

        Ok(found.and_then(|(employee, credential)| {
            self.credentials
                .matches(password, &credential)
                .then_some(employee)
        }))
    }

    async fn list_reports(&self, manager_id: i64) -> Result<Vec<Report>, StoreError> {
        let mut reports: Vec<Report> = self
            .tables()
            .employees
            .iter()
            .filter(|e| e.employee.manager_id == Some(manager_id))
            .map(|e| Report {
                employee_id: e.employee.employee_id,
                name: e.employee.name.clone(),
            })
            .collect();
        reports.sort_by(|a, b| a.name.cmp(&b.name).then(a.employee_id.cmp(&b.employee_id)));
        Ok(reports)
    }

    async fn list_goals(&self, employee_id: i64) -> Result<Vec<Goal>, StoreError> {
        let mut goals: Vec<Goal> = self
            .tables()
            .goals
            .iter()
            .filter(|g| g.employee_id == employee_id)
            .cloned()
            .collect();
        goals.sort_by_key(|g| (g.due_date, g.goal_id));
        Ok(goals)
    }

    async fn create_goal(&self, manager_id: i64, goal: &NewGoal) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables.manages(manager_id, goal.employee_id) {
            return Err(StoreError::NotPermitted(format!(
                "Employee {} is not one of your reports",
                goal.employee_id
            )));
        }
        let goal_id = tables.next_id();
        tables.goals.push(Goal {
            goal_id,
            employee_id: goal.employee_id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            due_date: goal.due_date,
            status: GoalStatus::NotStarted,
        });
        Ok(())
    }

    async fn set_goal_status(
        &self,
        manager_id: i64,
        goal_id: i64,
        status: GoalStatus,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables();
        let index = tables
            .managed_goal(manager_id, goal_id)
            .ok_or_else(|| foreign_goal(goal_id))?;
        tables.goals[index].status = status;
        Ok(())
    }

    async fn list_tasks(&self, goal_id: i64) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tables()
            .tasks
            .iter()
            .filter(|t| t.goal_id == goal_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.task_id);
        Ok(tasks)
    }

    async fn create_task(
        &self,
        employee_id: i64,
        goal_id: i64,
        description: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables
            .goals
            .iter()
            .any(|g| g.goal_id == goal_id && g.employee_id == employee_id)
        {
            return Err(StoreError::NotPermitted(format!(
                "Goal {goal_id} is not one of your goals"
            )));
        }
        let task_id = tables.next_id();
        tables.tasks.push(Task {
            task_id,
            goal_id,
            description: description.to_string(),
            status: TaskStatus::Pending,
        });
        Ok(())
    }

    async fn set_task_status(
        &self,
        manager_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables();
        let index = tables.tasks.iter().position(|t| {
            t.task_id == task_id
                && t.is_reviewable()
                && tables.managed_goal(manager_id, t.goal_id).is_some()
        });
        let index = index.ok_or_else(|| not_awaiting_review(task_id))?;
        tables.tasks[index].status = status;
        Ok(())
    }

    async fn list_feedback(&self, goal_id: i64) -> Result<Vec<FeedbackEntry>, StoreError> {
        let tables = self.tables();
        let mut rows: Vec<&StoredFeedback> =
            tables.feedback.iter().filter(|f| f.goal_id == goal_id).collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.feedback_id.cmp(&a.feedback_id))
        });

        // inner join: feedback whose author no longer exists is dropped
        Ok(rows
            .into_iter()
            .filter_map(|f| {
                let author = tables.employee(f.manager_id)?;
                Some(FeedbackEntry {
                    feedback_text: f.feedback_text.clone(),
                    created_at: f.created_at,
                    manager_name: author.name.clone(),
                })
            })
            .collect())
    }

    async fn create_feedback(
        &self,
        goal_id: i64,
        manager_id: i64,
        feedback_text: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if tables.managed_goal(manager_id, goal_id).is_none() {
            return Err(foreign_goal(goal_id));
        }
        let feedback_id = tables.next_id();
        tables.feedback.push(StoredFeedback {
            feedback_id,
            goal_id,
            manager_id,
            feedback_text: feedback_text.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        manager: i64,
        bob: i64,
        carol: i64,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new(CredentialPolicy::new(true));
        let manager = store.add_employee("Alice", "alice@example.com", "password", Role::Manager, None);
        let bob = store.add_employee("Bob", "bob@example.com", "bobpw", Role::Employee, Some(manager));
        let carol =
            store.add_employee("Carol", "carol@example.com", "carolpw", Role::Employee, Some(manager));
        Fixture { store, manager, bob, carol }
    }

    #[actix_web::test]
    async fn authenticate_returns_exactly_the_matching_employee() {
        let f = fixture();
        let found = f.store.authenticate("bob@example.com", "bobpw").await.unwrap();
        assert_eq!(found.map(|e| e.employee_id), Some(f.bob));

        assert!(f.store.authenticate("bob@example.com", "carolpw").await.unwrap().is_none());
        assert!(f.store.authenticate("nobody@example.com", "bobpw").await.unwrap().is_none());
        assert!(f.store.authenticate("BOB@example.com", "bobpw").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn lists_reports_of_one_manager_by_name() {
        let f = fixture();
        let reports = f.store.list_reports(f.manager).await.unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);
        assert!(f.store.list_reports(f.bob).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn goals_are_ordered_by_due_date_and_scoped_to_the_employee() {
        let f = fixture();
        f.store.add_goal(f.bob, "Late", date(2026, 12, 1));
        f.store.add_goal(f.bob, "Early", date(2026, 3, 1));
        f.store.add_goal(f.carol, "Carol's", date(2026, 1, 1));
        f.store.add_goal(f.bob, "Middle", date(2026, 6, 1));

        let goals = f.store.list_goals(f.bob).await.unwrap();
        let titles: Vec<&str> = goals.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Middle", "Late"]);
        assert!(goals.windows(2).all(|w| w[0].due_date <= w[1].due_date));
        assert!(goals.iter().all(|g| g.employee_id == f.bob));
    }

    #[actix_web::test]
    async fn new_goals_and_tasks_start_with_default_status() {
        let f = fixture();
        f.store
            .create_goal(f.manager, &NewGoal {
                employee_id: f.bob,
                title: "Ship v2".into(),
                description: Some("Release the new version".into()),
                due_date: date(2026, 11, 30),
            })
            .await
            .unwrap();
        let goal = f.store.list_goals(f.bob).await.unwrap().remove(0);
        assert_eq!(goal.status, GoalStatus::NotStarted);

        f.store.create_task(f.bob, goal.goal_id, "Write changelog").await.unwrap();
        let task = f.store.list_tasks(goal.goal_id).await.unwrap().remove(0);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[actix_web::test]
    async fn mutations_outside_the_reporting_line_are_refused() {
        let f = fixture();
        let dana = f.store.add_employee("Dana", "dana@example.com", "pw", Role::Manager, None);
        let goal_id = f.store.add_goal(f.bob, "Goal", date(2026, 5, 1));
        let task_id = f.store.add_task(goal_id, "task");
        let new_goal = NewGoal {
            employee_id: f.bob,
            title: "x".into(),
            description: None,
            due_date: date(2026, 1, 1),
        };

        let refused = [
            f.store.create_goal(dana, &new_goal).await,
            f.store.set_goal_status(dana, goal_id, GoalStatus::Completed).await,
            f.store.create_feedback(goal_id, dana, "drive-by").await,
            f.store.create_task(f.carol, goal_id, "not mine").await,
            f.store.create_task(f.bob, 999, "orphan").await,
        ];
        for result in refused {
            assert!(matches!(result, Err(StoreError::NotPermitted(_))), "{result:?}");
        }
        let err = f.store.set_task_status(dana, task_id, TaskStatus::Approved).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert_eq!(f.store.list_goals(f.bob).await.unwrap().len(), 1);
        assert_eq!(f.store.list_goals(f.bob).await.unwrap()[0].status, GoalStatus::NotStarted);
        assert_eq!(f.store.list_tasks(goal_id).await.unwrap().len(), 1);
        assert_eq!(f.store.list_tasks(goal_id).await.unwrap()[0].status, TaskStatus::Pending);
        assert!(f.store.list_feedback(goal_id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn reviewed_tasks_cannot_be_reviewed_again() {
        let f = fixture();
        let goal_id = f.store.add_goal(f.bob, "Goal", date(2026, 5, 1));
        let task_id = f.store.add_task(goal_id, "task");

        f.store.set_task_status(f.manager, task_id, TaskStatus::Approved).await.unwrap();
        let err = f
            .store
            .set_task_status(f.manager, task_id, TaskStatus::Rejected)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already reviewed"));
        assert_eq!(f.store.list_tasks(goal_id).await.unwrap()[0].status, TaskStatus::Approved);
    }

    #[actix_web::test]
    async fn setting_goal_status_is_idempotent() {
        let f = fixture();
        let goal_id = f.store.add_goal(f.bob, "Goal", date(2026, 5, 1));

        f.store.set_goal_status(f.manager, goal_id, GoalStatus::InProgress).await.unwrap();
        let once = f.store.list_goals(f.bob).await.unwrap();
        f.store.set_goal_status(f.manager, goal_id, GoalStatus::InProgress).await.unwrap();
        let twice = f.store.list_goals(f.bob).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[0].status, GoalStatus::InProgress);
    }

    #[actix_web::test]
    async fn approving_a_task_leaves_the_others_untouched() {
        let f = fixture();
        let goal_id = f.store.add_goal(f.bob, "Goal", date(2026, 5, 1));
        let first = f.store.add_task(goal_id, "first");
        let second = f.store.add_task(goal_id, "second");
        let third = f.store.add_task(goal_id, "third");

        f.store.set_task_status(f.manager, second, TaskStatus::Approved).await.unwrap();

        let tasks = f.store.list_tasks(goal_id).await.unwrap();
        let statuses: Vec<(i64, TaskStatus)> = tasks.iter().map(|t| (t.task_id, t.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (first, TaskStatus::Pending),
                (second, TaskStatus::Approved),
                (third, TaskStatus::Pending),
            ]
        );
    }

    #[actix_web::test]
    async fn feedback_is_listed_newest_first_with_author_name() {
        let f = fixture();
        let goal_id = f.store.add_goal(f.bob, "Goal", date(2026, 5, 1));
        let base = Utc::now();
        f.store.add_feedback_at(goal_id, f.manager, "oldest", base - chrono::Duration::hours(2));
        f.store.add_feedback_at(goal_id, f.manager, "newest", base);
        f.store.add_feedback_at(goal_id, f.manager, "middle", base - chrono::Duration::hours(1));
        f.store.create_feedback(goal_id, f.manager, "just now").await.unwrap();

        let feedback = f.store.list_feedback(goal_id).await.unwrap();
        let texts: Vec<&str> = feedback.iter().map(|f| f.feedback_text.as_str()).collect();
        assert_eq!(texts, vec!["just now", "newest", "middle", "oldest"]);
        assert!(feedback.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(feedback.iter().all(|f| f.manager_name == "Alice"));
    }
}
