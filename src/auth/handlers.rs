use actix_web::{
    HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    http::{StatusCode, header},
    web,
};
use tracing::{info, instrument};

use crate::{
    api::{html, see_other},
    auth::{extractor::SESSION_COOKIE, jwt::generate_session_token},
    config::Config,
    controller::Session,
    error::AppError,
    models::LoginForm,
    pages,
    store::PerformanceStore,
};

/// `GET /` sends signed-in users to their dashboard and everyone else to login.
pub async fn index(session: Session) -> HttpResponse {
    match session.user() {
        Some(_) => see_other("/dashboard"),
        None => see_other("/login"),
    }
}

pub async fn login_form(session: Session) -> HttpResponse {
    if session.user().is_some() {
        return see_other("/dashboard");
    }
    html(
        StatusCode::OK,
        pages::login_page("", session.error()),
    )
}

#[instrument(
    name = "auth_login",
    skip(form, store, config),
    fields(email = %form.email)
)]
pub async fn login(
    form: web::Form<LoginForm>,
    store: web::Data<dyn PerformanceStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let form = form.into_inner();
    let mut session = Session::default();
    let user = session
        .login(store.get_ref(), form.email.trim(), &form.password)
        .await
        .cloned();

    let Some(user) = user else {
        return Ok(html(
            StatusCode::UNAUTHORIZED,
            pages::login_page(&form.email, session.error()),
        ));
    };

    let token = generate_session_token(&user, &config.session_secret, config.session_ttl)?;
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.session_ttl as i64))
        .finish();

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/dashboard"))
        .cookie(cookie)
        .finish())
}

/// Drops the cookie. Sessions are stateless, so a copied token stays valid
/// until its `exp`.
pub async fn logout(mut session: Session) -> HttpResponse {
    if let Some(user) = session.user() {
        info!(employee_id = user.employee_id, "Logout");
    }
    session.logout();

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(cookie)
        .finish()
}
