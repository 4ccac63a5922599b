pub mod dashboard;
pub mod goal;
pub mod health;
pub mod task;

use actix_web::{HttpResponse, http::StatusCode, http::header};

use crate::controller::Refresh;

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Post/Redirect/Get: after a mutation the browser reloads the whole view.
pub(crate) fn reload(refresh: Refresh) -> HttpResponse {
    see_other(&refresh.navigation.href())
}
