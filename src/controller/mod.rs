//! Maps UI actions onto single store operations and re-derives views.
//!
//! The flow is one-directional: an [`Action`] performs exactly one mutation
//! and yields a [`Refresh`] naming the view to reload; [`Controller::load`]
//! then rebuilds that whole view from fresh reads. Nothing is cached between
//! the two.

pub mod report;
pub mod session;

use chrono::NaiveDate;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;

use crate::error::AppError;
use crate::model::{FeedbackEntry, Goal, GoalStatus, NewGoal, Report, Review, Role, Task};
use crate::store::PerformanceStore;

pub use report::{PerformanceReport, ReportRow};
pub use session::{CurrentUser, Session, SessionState};

/// Manager menu. Switching between entries has no side effects.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Display, EnumString, EnumIter)]
pub enum MenuChoice {
    #[default]
    #[strum(serialize = "performance")]
    ViewPerformance,
    #[strum(serialize = "new-goal")]
    AddNewGoal,
    #[strum(serialize = "report")]
    PerformanceReport,
}

impl MenuChoice {
    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::ViewPerformance => "View Performance",
            MenuChoice::AddNewGoal => "Add New Goal",
            MenuChoice::PerformanceReport => "Performance Report",
        }
    }
}

/// What the dashboard should show: the selected report (managers only) and
/// the menu entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    pub employee: Option<i64>,
    pub menu: MenuChoice,
}

impl Navigation {
    pub fn new(employee: Option<i64>, view: Option<&str>) -> Self {
        Self {
            employee,
            menu: view.and_then(|v| v.parse().ok()).unwrap_or_default(),
        }
    }

    pub fn performance(employee: Option<i64>) -> Self {
        Self {
            employee,
            menu: MenuChoice::ViewPerformance,
        }
    }

    pub fn href(&self) -> String {
        match self.employee {
            Some(id) => format!("/dashboard?employee={id}&view={}", self.menu),
            None => format!("/dashboard?view={}", self.menu),
        }
    }
}

/// A mutation requested from the UI. Each maps to exactly one store call,
/// which also checks the signed-in user owns the targeted row.
#[derive(Debug, Clone)]
pub enum Action {
    UpdateGoalStatus {
        goal_id: i64,
        status: GoalStatus,
        employee_id: i64,
    },
    ReviewTask {
        task_id: i64,
        review: Review,
        employee_id: i64,
    },
    SubmitFeedback {
        goal_id: i64,
        feedback_text: String,
        employee_id: i64,
    },
    AddGoal(NewGoal),
    LogTask {
        goal_id: i64,
        description: String,
    },
}

/// The view that must be rebuilt after a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalCard {
    pub goal: Goal,
    pub tasks: Vec<Task>,
    pub feedback: Vec<FeedbackEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ManagerContent {
    Performance(Vec<GoalCard>),
    NewGoal,
    Report(PerformanceReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerDashboard {
    pub reports: Vec<Report>,
    pub selected: Report,
    pub menu: MenuChoice,
    pub content: ManagerContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// A manager with nobody reporting to them; nothing else is offered.
    NoReports,
    Manager(ManagerDashboard),
    Employee(Vec<GoalCard>),
}

pub struct Controller<'a> {
    store: &'a dyn PerformanceStore,
}

impl<'a> Controller<'a> {
    pub fn new(store: &'a dyn PerformanceStore) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, session: &Session, action: Action) -> Result<Refresh, AppError> {
        let user = session.require_user()?;

        let navigation = match action {
            Action::UpdateGoalStatus {
                goal_id,
                status,
                employee_id,
            } => {
                user.require_manager()?;
                self.store
                    .set_goal_status(user.employee_id, goal_id, status)
                    .await?;
                info!(goal_id, status = %status, "Goal status updated");
                Navigation::performance(Some(employee_id))
            }
            Action::ReviewTask {
                task_id,
                review,
                employee_id,
            } => {
                user.require_manager()?;
                self.store
                    .set_task_status(user.employee_id, task_id, review.into())
                    .await?;
                info!(task_id, ?review, "Task reviewed");
                Navigation::performance(Some(employee_id))
            }
            Action::SubmitFeedback {
                goal_id,
                feedback_text,
                employee_id,
            } => {
                user.require_manager()?;
                let text = feedback_text.trim();
                if text.is_empty() {
                    return Err(AppError::Validation("Feedback cannot be empty".into()));
                }
                self.store
                    .create_feedback(goal_id, user.employee_id, text)
                    .await?;
                info!(goal_id, manager_id = user.employee_id, "Feedback submitted");
                Navigation::performance(Some(employee_id))
            }
            Action::AddGoal(goal) => {
                user.require_manager()?;
                if goal.title.trim().is_empty() {
                    return Err(AppError::Validation("Goal title cannot be empty".into()));
                }
                self.store.create_goal(user.employee_id, &goal).await?;
                info!(employee_id = goal.employee_id, "Goal created");
                Navigation::performance(Some(goal.employee_id))
            }
            Action::LogTask {
                goal_id,
                description,
            } => {
                user.require_employee()?;
                let description = description.trim();
                if description.is_empty() {
                    return Err(AppError::Validation(
                        "Task description cannot be empty".into(),
                    ));
                }
                self.store
                    .create_task(user.employee_id, goal_id, description)
                    .await?;
                info!(goal_id, employee_id = user.employee_id, "Task logged");
                Navigation::performance(None)
            }
        };

        Ok(Refresh { navigation })
    }

    /// Rebuilds the whole view for the signed-in user from fresh reads.
    pub async fn load(&self, session: &Session, navigation: &Navigation) -> Result<View, AppError> {
        let user = session.require_user()?;
        match user.role {
            Role::Manager => self.load_manager(user, navigation).await,
            Role::Employee => Ok(View::Employee(self.goal_cards(user.employee_id).await?)),
        }
    }

    async fn load_manager(
        &self,
        user: &CurrentUser,
        navigation: &Navigation,
    ) -> Result<View, AppError> {
        let reports = self.store.list_reports(user.employee_id).await?;

        // requested employee must be one of this manager's reports
        let selected = navigation
            .employee
            .and_then(|id| reports.iter().find(|r| r.employee_id == id))
            .or_else(|| reports.first())
            .cloned();
        let Some(selected) = selected else {
            return Ok(View::NoReports);
        };

        let content = match navigation.menu {
            MenuChoice::ViewPerformance => {
                ManagerContent::Performance(self.goal_cards(selected.employee_id).await?)
            }
            MenuChoice::AddNewGoal => ManagerContent::NewGoal,
            MenuChoice::PerformanceReport => {
                let cards = self.goal_cards(selected.employee_id).await?;
                ManagerContent::Report(PerformanceReport::build(&cards))
            }
        };

        Ok(View::Manager(ManagerDashboard {
            reports,
            selected,
            menu: navigation.menu,
            content,
        }))
    }

    async fn goal_cards(&self, employee_id: i64) -> Result<Vec<GoalCard>, AppError> {
        let goals = self.store.list_goals(employee_id).await?;
        let mut cards = Vec::with_capacity(goals.len());
        for goal in goals {
            let tasks = self.store.list_tasks(goal.goal_id).await?;
            let feedback = self.store.list_feedback(goal.goal_id).await?;
            cards.push(GoalCard {
                goal,
                tasks,
                feedback,
            });
        }
        Ok(cards)
    }
}

/// Parses a `YYYY-MM-DD` date as sent by an HTML date input.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid due date '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::CredentialPolicy;
    use crate::error::StoreError;
    use crate::model::TaskStatus;
    use crate::store::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        manager: Session,
        employee: Session,
        bob: i64,
        goal_id: i64,
        task_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new(CredentialPolicy::new(true));
        let alice = store.add_employee("Alice", "alice@example.com", "password", Role::Manager, None);
        let bob = store.add_employee("Bob", "bob@example.com", "bobpw", Role::Employee, Some(alice));
        let goal_id = store.add_goal(bob, "Improve test coverage", parse_due_date("2026-12-31").unwrap());
        let task_id = store.add_task(goal_id, "Add controller tests");

        let mut manager = Session::default();
        manager.login(&store, "alice@example.com", "password").await;
        let mut employee = Session::default();
        employee.login(&store, "bob@example.com", "bobpw").await;

        Fixture {
            store,
            manager,
            employee,
            bob,
            goal_id,
            task_id,
        }
    }

    fn performance_cards(view: View) -> Vec<GoalCard> {
        match view {
            View::Manager(ManagerDashboard {
                content: ManagerContent::Performance(cards),
                ..
            }) => cards,
            other => panic!("expected performance view, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn approving_a_task_removes_its_review_controls_after_reload() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);

        let before = performance_cards(
            controller
                .load(&f.manager, &Navigation::performance(Some(f.bob)))
                .await
                .unwrap(),
        );
        assert!(before[0].tasks[0].is_reviewable());

        let refresh = controller
            .dispatch(
                &f.manager,
                Action::ReviewTask {
                    task_id: f.task_id,
                    review: Review::Approve,
                    employee_id: f.bob,
                },
            )
            .await
            .unwrap();
        assert_eq!(refresh.navigation, Navigation::performance(Some(f.bob)));

        let after = performance_cards(controller.load(&f.manager, &refresh.navigation).await.unwrap());
        let task = &after[0].tasks[0];
        assert_eq!(task.status, TaskStatus::Approved);
        assert!(!task.is_reviewable());
    }

    #[actix_web::test]
    async fn manager_without_reports_gets_terminal_view() {
        let store = MemoryStore::new(CredentialPolicy::new(true));
        store.add_employee("Dana", "dana@example.com", "pw", Role::Manager, None);
        let mut session = Session::default();
        session.login(&store, "dana@example.com", "pw").await;

        let view = Controller::new(&store)
            .load(&session, &Navigation::default())
            .await
            .unwrap();
        assert_eq!(view, View::NoReports);
    }

    #[actix_web::test]
    async fn selection_falls_back_to_first_report_when_not_managed() {
        let f = fixture().await;
        let stranger = f.store.add_employee("Eve", "eve@example.com", "pw", Role::Employee, None);

        let view = Controller::new(&f.store)
            .load(&f.manager, &Navigation::performance(Some(stranger)))
            .await
            .unwrap();
        match view {
            View::Manager(dashboard) => assert_eq!(dashboard.selected.employee_id, f.bob),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[actix_web::test]
    async fn switching_menu_does_not_mutate() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);
        for menu in [MenuChoice::AddNewGoal, MenuChoice::PerformanceReport] {
            controller
                .load(&f.manager, &Navigation { employee: Some(f.bob), menu })
                .await
                .unwrap();
        }
        let goals = f.store.list_goals(f.bob).await.unwrap();
        assert_eq!(goals[0].status, GoalStatus::NotStarted);
        assert_eq!(f.store.list_tasks(f.goal_id).await.unwrap()[0].status, TaskStatus::Pending);
    }

    #[actix_web::test]
    async fn report_view_summarises_goals() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);
        controller
            .dispatch(
                &f.manager,
                Action::UpdateGoalStatus {
                    goal_id: f.goal_id,
                    status: GoalStatus::Completed,
                    employee_id: f.bob,
                },
            )
            .await
            .unwrap();

        let nav = Navigation {
            employee: Some(f.bob),
            menu: MenuChoice::PerformanceReport,
        };
        match controller.load(&f.manager, &nav).await.unwrap() {
            View::Manager(ManagerDashboard {
                content: ManagerContent::Report(report),
                ..
            }) => {
                assert_eq!(report.completed, 1);
                assert_eq!(report.tasks_pending, 1);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[actix_web::test]
    async fn feedback_and_goals_are_created_for_the_selected_report() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);

        controller
            .dispatch(
                &f.manager,
                Action::SubmitFeedback {
                    goal_id: f.goal_id,
                    feedback_text: "  Great progress  ".into(),
                    employee_id: f.bob,
                },
            )
            .await
            .unwrap();
        controller
            .dispatch(
                &f.manager,
                Action::AddGoal(NewGoal {
                    employee_id: f.bob,
                    title: "Mentor a new hire".into(),
                    description: None,
                    due_date: parse_due_date("2026-06-30").unwrap(),
                }),
            )
            .await
            .unwrap();

        let cards = performance_cards(
            controller
                .load(&f.manager, &Navigation::performance(Some(f.bob)))
                .await
                .unwrap(),
        );
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].goal.title, "Mentor a new hire");
        assert_eq!(cards[1].feedback[0].feedback_text, "Great progress");
        assert_eq!(cards[1].feedback[0].manager_name, "Alice");
    }

    #[actix_web::test]
    async fn empty_feedback_is_rejected_without_touching_the_store() {
        let f = fixture().await;
        let err = Controller::new(&f.store)
            .dispatch(
                &f.manager,
                Action::SubmitFeedback {
                    goal_id: f.goal_id,
                    feedback_text: "   ".into(),
                    employee_id: f.bob,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(f.store.list_feedback(f.goal_id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn roles_are_enforced() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);

        let err = controller
            .dispatch(
                &f.employee,
                Action::ReviewTask {
                    task_id: f.task_id,
                    review: Review::Approve,
                    employee_id: f.bob,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = controller
            .dispatch(
                &f.manager,
                Action::LogTask {
                    goal_id: f.goal_id,
                    description: "sneaky".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = controller
            .dispatch(
                &Session::default(),
                Action::LogTask {
                    goal_id: f.goal_id,
                    description: "anon".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[actix_web::test]
    async fn a_second_review_is_refused() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);
        let review = |review| Action::ReviewTask {
            task_id: f.task_id,
            review,
            employee_id: f.bob,
        };

        controller.dispatch(&f.manager, review(Review::Approve)).await.unwrap();
        let err = controller
            .dispatch(&f.manager, review(Review::Reject))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Validation(_))));
        assert_eq!(f.store.list_tasks(f.goal_id).await.unwrap()[0].status, TaskStatus::Approved);
    }

    #[actix_web::test]
    async fn other_employees_cannot_log_tasks_on_a_goal() {
        let f = fixture().await;
        f.store.add_employee("Mallory", "mallory@example.com", "pw", Role::Employee, None);
        let mut mallory = Session::default();
        mallory.login(&f.store, "mallory@example.com", "pw").await;

        let err = Controller::new(&f.store)
            .dispatch(
                &mallory,
                Action::LogTask {
                    goal_id: f.goal_id,
                    description: "not mine".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NotPermitted(_))));
        assert_eq!(f.store.list_tasks(f.goal_id).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn employee_logs_tasks_on_own_goals() {
        let f = fixture().await;
        let controller = Controller::new(&f.store);
        let refresh = controller
            .dispatch(
                &f.employee,
                Action::LogTask {
                    goal_id: f.goal_id,
                    description: "Cover the store".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(refresh.navigation.employee, None);

        match controller.load(&f.employee, &refresh.navigation).await.unwrap() {
            View::Employee(cards) => {
                let descriptions: Vec<&str> =
                    cards[0].tasks.iter().map(|t| t.description.as_str()).collect();
                assert_eq!(descriptions, vec!["Add controller tests", "Cover the store"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn navigation_round_trips_through_href() {
        let nav = Navigation::new(Some(7), Some("report"));
        assert_eq!(nav.menu, MenuChoice::PerformanceReport);
        assert_eq!(nav.href(), "/dashboard?employee=7&view=report");
        assert_eq!(Navigation::new(None, Some("bogus")).menu, MenuChoice::ViewPerformance);
    }

    #[test]
    fn due_dates_must_be_iso() {
        assert!(parse_due_date("2026-02-28").is_ok());
        assert!(parse_due_date("28/02/2026").is_err());
    }
}
