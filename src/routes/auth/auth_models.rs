use serde::{Deserialize, Serialize};

use crate::routes::users::user_models::UserResponse;

// Login request and response
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct LoginFailureResponse {
    pub success: bool,
    pub message: String,
}
