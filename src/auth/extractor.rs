use actix_web::HttpMessage;
use actix_web::{FromRequest, HttpRequest, cookie::Cookie, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::controller::{CurrentUser, Session};

pub const SESSION_COOKIE: &str = "pms_session";

/// Decodes the session cookie, if present and valid.
pub fn session_from_cookie(cookie: Option<Cookie<'static>>, config: &Config) -> Session {
    cookie
        .and_then(|cookie| verify_token(cookie.value(), &config.session_secret).ok())
        .map(|claims| Session::authenticated(CurrentUser::from(claims)))
        .unwrap_or_default()
}

/// Protected routes get the session placed by `session_middleware`; anywhere
/// else it is decoded straight from the cookie.
impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(session) = req.extensions().get::<Session>() {
            return ready(Ok(session.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ));
            }
        };

        ready(Ok(session_from_cookie(req.cookie(SESSION_COOKIE), config)))
    }
}
