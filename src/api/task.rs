use actix_web::{HttpResponse, web};

use super::reload;
use crate::{
    controller::{Action, Controller, Session},
    error::AppError,
    model::Review,
    models::{ReviewForm, TaskForm},
    store::PerformanceStore,
};

/// `POST /goals/{goal_id}/tasks`, employees logging work against a goal.
pub async fn log_task(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    path: web::Path<i64>,
    form: web::Form<TaskForm>,
) -> Result<HttpResponse, AppError> {
    let refresh = Controller::new(store.get_ref())
        .dispatch(
            &session,
            Action::LogTask {
                goal_id: path.into_inner(),
                description: form.into_inner().description,
            },
        )
        .await?;
    Ok(reload(refresh))
}

async fn review(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    task_id: i64,
    employee_id: i64,
    review: Review,
) -> Result<HttpResponse, AppError> {
    let refresh = Controller::new(store.get_ref())
        .dispatch(
            &session,
            Action::ReviewTask {
                task_id,
                review,
                employee_id,
            },
        )
        .await?;
    Ok(reload(refresh))
}

/// `POST /tasks/{task_id}/approve`
pub async fn approve_task(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    path: web::Path<i64>,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    review(session, store, path.into_inner(), form.employee, Review::Approve).await
}

/// `POST /tasks/{task_id}/reject`
pub async fn reject_task(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    path: web::Path<i64>,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    review(session, store, path.into_inner(), form.employee, Review::Reject).await
}
