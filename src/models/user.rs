use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub hours: f64,
    /// Permission flags, stored as a JSON object in TEXT.
    pub permissions: Option<String>,
    pub created_at: DateTime<Utc>,
}
