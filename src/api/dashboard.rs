use actix_web::{HttpResponse, http::StatusCode, web};

use super::html;
use crate::{
    controller::{Controller, Navigation, Session},
    error::AppError,
    models::DashboardQuery,
    pages,
    store::PerformanceStore,
};

/// `GET /dashboard` re-derives the entire view on every request.
pub async fn dashboard(
    session: Session,
    store: web::Data<dyn PerformanceStore>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let user = session.require_user()?;
    let navigation = Navigation::new(query.employee_id(), query.view.as_deref());

    let view = Controller::new(store.get_ref())
        .load(&session, &navigation)
        .await?;

    Ok(html(StatusCode::OK, pages::dashboard_page(user, &view)))
}
