use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::pages;

/// Shown whenever the database cannot be reached, at startup or mid-session.
pub const CONNECTION_REMEDIATION: &str = "\
1. Make sure the MySQL server is running and reachable from this host.
2. Check PMS_DB_HOST, PMS_DB_USER, PMS_DB_PASSWORD and PMS_DB_NAME in the environment or .env file.
3. Confirm the database exists and that schema/pms_system.sql has been applied.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("failed to load config file: {0}")]
    File(#[from] dotenvy::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached; carries the driver's cause.
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),
    /// A value outside its closed enumeration, or a reference to a missing row.
    #[error("{0}")]
    Validation(String),
    /// The acting employee does not own the row the mutation targets.
    #[error("{0}")]
    NotPermitted(String),
    #[error(transparent)]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(e),
            other => StoreError::Query(other),
        }
    }
}

impl StoreError {
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

/// Errors surfaced to the person operating the UI. The message is shown verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Not signed in")]
    Unauthenticated,
    #[error("Failed to issue session: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::Validation(_)) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Store(StoreError::Query(_)) | AppError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Store(StoreError::NotPermitted(_)) | AppError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let guidance = match self {
            AppError::Store(e) if e.is_connection() => Some(CONNECTION_REMEDIATION),
            _ => None,
        };
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(pages::error_page(&self.to_string(), guidance))
    }
}
