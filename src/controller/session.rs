use tracing::{info, warn};

use crate::error::AppError;
use crate::model::{Employee, Role};
use crate::models::SessionClaims;
use crate::store::PerformanceStore;

/// The signed-in employee as carried by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub employee_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    pub fn require_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Managers only"))
        }
    }

    pub fn require_employee(&self) -> Result<(), AppError> {
        if self.role == Role::Employee {
            Ok(())
        } else {
            Err(AppError::Forbidden("Employees only"))
        }
    }
}

impl From<Employee> for CurrentUser {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.employee_id,
            name: e.name,
            email: e.email,
            role: e.role,
        }
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(c: SessionClaims) -> Self {
        Self {
            employee_id: c.employee_id,
            name: c.name,
            email: c.sub,
            role: c.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(CurrentUser),
}

/// Session context handed to every handler. Holds the signed-in user (if
/// any) and the message from the last failed login.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    error: Option<String>,
}

impl Session {
    pub fn authenticated(user: CurrentUser) -> Self {
        Self {
            state: SessionState::Authenticated(user),
            error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn require_user(&self) -> Result<&CurrentUser, AppError> {
        self.user().ok_or(AppError::Unauthenticated)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Only accepted while unauthenticated. On failure the session stays
    /// unauthenticated and keeps the message to show; on success any earlier
    /// message is cleared.
    pub async fn login(
        &mut self,
        store: &dyn PerformanceStore,
        email: &str,
        password: &str,
    ) -> Option<&CurrentUser> {
        if let SessionState::Authenticated(_) = self.state {
            return self.user();
        }

        match store.authenticate(email, password).await {
            Ok(Some(employee)) => {
                info!(employee_id = employee.employee_id, role = %employee.role, "Login successful");
                self.state = SessionState::Authenticated(employee.into());
                self.error = None;
                self.user()
            }
            Ok(None) => {
                info!("Invalid credentials");
                self.error = Some("Invalid email or password".to_string());
                None
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.error = Some(format!("An error occurred during login: {e}"));
                None
            }
        }
    }

    /// Drops the user and any selection state.
    pub fn logout(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.error = None;
    }
}
