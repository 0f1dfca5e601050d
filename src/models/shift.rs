use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shift {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub date: String,
    /// Clock strings like "08:00", not timestamps.
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub shift_type: String,
    pub notes: Option<String>,
    pub status: String,
    /// User ids that have seen this shift, stored as a JSON array in TEXT.
    pub viewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
