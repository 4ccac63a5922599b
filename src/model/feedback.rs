use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One feedback note on a goal, joined with the authoring manager's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackEntry {
    pub feedback_text: String,
    pub created_at: DateTime<Utc>,
    pub manager_name: String,
}
