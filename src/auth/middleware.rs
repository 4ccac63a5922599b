use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web::Data,
};
use tracing::debug;

use crate::auth::extractor::{SESSION_COOKIE, session_from_cookie};
use crate::config::Config;

/// Guards the dashboard and action routes: a request without a valid session
/// cookie is sent to the login form.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let session = session_from_cookie(req.cookie(SESSION_COOKIE), config);
    if session.user().is_none() {
        debug!(path = req.path(), "No valid session, redirecting to login");
        let resp = HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .finish();
        return Ok(req.into_response(resp));
    }

    req.extensions_mut().insert(session);

    next.call(req).await
}
