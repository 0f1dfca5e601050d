use actix_web::{web, HttpResponse, Responder};
use bcrypt::verify;
use log::{error, info};
use sqlx::SqlitePool;

use crate::auth::Authenticator;
use crate::models::user::User;
use crate::routes::users::user_models::UserResponse;

use super::auth_models::{LoginFailureResponse, LoginRequest, LoginResponse};

// Exchange username and password for a bearer token
pub async fn login(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let username = &req.username;
    info!("Received login request for user: {}", username);

    let result = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, name, email, role, status, phone, hours, permissions, created_at \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool.get_ref())
    .await;

    let user = match result {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid username: {}", username);
            return HttpResponse::Unauthorized().json(LoginFailureResponse {
                success: false,
                message: "Invalid username".into(),
            });
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", username, e);
            return HttpResponse::InternalServerError().json(LoginFailureResponse {
                success: false,
                message: "Failed to check credentials".into(),
            });
        }
    };

    let valid = match verify(&req.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!("Error when checking password for user {}: {}", username, e);
            return HttpResponse::Unauthorized().json(LoginFailureResponse {
                success: false,
                message: "Error when checking password".into(),
            });
        }
    };

    if !valid {
        info!("Invalid password for user: {}", username);
        return HttpResponse::Unauthorized().json(LoginFailureResponse {
            success: false,
            message: "Invalid password".into(),
        });
    }

    let token = match auth.issue(&user.id, &user.username, &user.role) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to issue token for user {}: {}", username, e);
            return HttpResponse::InternalServerError().json(LoginFailureResponse {
                success: false,
                message: "Failed to issue token".into(),
            });
        }
    };

    info!("User {} logged in successfully", username);
    HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserResponse::from(user),
    })
}
