use actix_web::{HttpResponse, web};
use tracing::debug;

use super::reload;
use crate::{
    controller::{Action, Controller, Session, parse_due_date},
    error::AppError,
    model::{GoalStatus, NewGoal},
    models::{FeedbackForm, GoalStatusForm, NewGoalForm},
    store::PerformanceStore,
};

/// `POST /goals`
pub async fn add_goal(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    form: web::Form<NewGoalForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let description = Some(form.description.trim().to_string()).filter(|d| !d.is_empty());
    let goal = NewGoal {
        employee_id: form.employee,
        title: form.title.trim().to_string(),
        description,
        due_date: parse_due_date(&form.due_date)?,
    };

    let refresh = Controller::new(store.get_ref())
        .dispatch(&session, Action::AddGoal(goal))
        .await?;
    Ok(reload(refresh))
}

/// `POST /goals/{goal_id}/status`
pub async fn update_goal_status(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    path: web::Path<i64>,
    form: web::Form<GoalStatusForm>,
) -> Result<HttpResponse, AppError> {
    let goal_id = path.into_inner();
    let status: GoalStatus = form.status.parse().map_err(|_| {
        debug!(goal_id, status = %form.status, "Rejected unknown goal status");
        AppError::Validation(format!(
            "Invalid goal status '{}'. Allowed: Not Started, In Progress, Completed, On Hold",
            form.status
        ))
    })?;

    let refresh = Controller::new(store.get_ref())
        .dispatch(
            &session,
            Action::UpdateGoalStatus {
                goal_id,
                status,
                employee_id: form.employee,
            },
        )
        .await?;
    Ok(reload(refresh))
}

/// `POST /goals/{goal_id}/feedback`
pub async fn submit_feedback(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    path: web::Path<i64>,
    form: web::Form<FeedbackForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let refresh = Controller::new(store.get_ref())
        .dispatch(
            &session,
            Action::SubmitFeedback {
                goal_id: path.into_inner(),
                feedback_text: form.feedback_text,
                employee_id: form.employee,
            },
        )
        .await?;
    Ok(reload(refresh))
}
