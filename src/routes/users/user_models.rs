use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::user::User;

// User as returned to clients: no password hash, permissions parsed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub hours: f64,
    pub permissions: Value,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let permissions = user
            .permissions
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| Value::Object(Default::default()));
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            phone: user.phone,
            hours: user.hours,
            permissions,
            created_at: user.created_at,
        }
    }
}

// Create request and response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub permissions: Option<Value>,
}

#[derive(Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub id: String,
}

// Update request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub hours: f64,
    pub permissions: Option<Value>,
}

#[derive(Serialize)]
pub struct UserMutationResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_strips_hash_and_parses_permissions() {
        let user = User {
            id: "user-1".into(),
            username: "marvin".into(),
            password_hash: "$2b$12$secret".into(),
            name: "Marvin".into(),
            email: None,
            role: "admin".into(),
            status: "aktiv".into(),
            phone: None,
            hours: 12.5,
            permissions: Some(r#"{"canManageShifts":true}"#.into()),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["permissions"]["canManageShifts"], true);
    }

    #[test]
    fn malformed_permissions_fall_back_to_an_empty_object() {
        let user = User {
            id: "user-1".into(),
            username: "marvin".into(),
            password_hash: "hash".into(),
            name: "Marvin".into(),
            email: None,
            role: "employee".into(),
            status: "aktiv".into(),
            phone: None,
            hours: 0.0,
            permissions: Some("not json".into()),
            created_at: Utc::now(),
        };

        let response = UserResponse::from(user);
        assert_eq!(response.permissions, Value::Object(Default::default()));
    }
}
