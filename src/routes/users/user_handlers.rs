use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use log::{error, info};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::models::user::User;
use crate::notifier::{ChangeKind, ChangeNotifier};

use super::user_models::{
    CreateUserRequest, CreateUserResponse, UpdateUserRequest, UserMutationResponse, UserResponse,
};

const SELECT_USERS: &str = "SELECT id, username, password_hash, name, email, role, status, phone, \
                            hours, permissions, created_at FROM users";

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(UserMutationResponse {
        success: false,
        message: "Authentication required".into(),
    })
}

// Get all users, without password hashes
pub async fn get_users(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected users request: {}", e);
        return unauthorized();
    }

    let users = sqlx::query_as::<_, User>(SELECT_USERS)
        .fetch_all(pool.get_ref())
        .await;

    match users {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            error!("Failed to fetch users: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Create a user with a bcrypt-hashed password
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    request: web::Json<CreateUserRequest>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected create user request: {}", e);
        return unauthorized();
    }

    let request = request.into_inner();
    info!("Received request to create user: {}", request.username);

    let password_hash = match hash(&request.password, DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError().json(UserMutationResponse {
                success: false,
                message: "Failed to hash password".into(),
            });
        }
    };

    let id = request.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let permissions = request
        .permissions
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
        .to_string();

    let result = sqlx::query(
        "INSERT INTO users (id, username, password_hash, name, email, role, phone, permissions, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&request.username)
    .bind(password_hash)
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.role)
    .bind(&request.phone)
    .bind(permissions)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!("User {} created", request.username);
            notifier.notify(ChangeKind::Users);
            HttpResponse::Ok().json(CreateUserResponse { success: true, id })
        }
        Err(e) => {
            error!("Failed to create user {}: {}", request.username, e);
            HttpResponse::BadRequest().json(UserMutationResponse {
                success: false,
                message: "User could not be created".into(),
            })
        }
    }
}

// Update profile fields of an existing user
pub async fn update_user(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected update user request: {}", e);
        return unauthorized();
    }

    let id = path.into_inner();
    let permissions = request
        .permissions
        .clone()
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
        .to_string();

    let result = sqlx::query(
        "UPDATE users SET name = ?, email = ?, role = ?, status = ?, phone = ?, hours = ?, permissions = ? \
         WHERE id = ?",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.role)
    .bind(&request.status)
    .bind(&request.phone)
    .bind(request.hours)
    .bind(permissions)
    .bind(&id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            notifier.notify(ChangeKind::Users);
            HttpResponse::Ok().json(UserMutationResponse {
                success: true,
                message: "User updated".into(),
            })
        }
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            HttpResponse::InternalServerError().json(UserMutationResponse {
                success: false,
                message: "Update failed".into(),
            })
        }
    }
}

// Delete a user
pub async fn delete_user(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected delete user request: {}", e);
        return unauthorized();
    }

    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            notifier.notify(ChangeKind::Users);
            HttpResponse::Ok().json(UserMutationResponse {
                success: true,
                message: "User deleted".into(),
            })
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            HttpResponse::InternalServerError().json(UserMutationResponse {
                success: false,
                message: "Delete failed".into(),
            })
        }
    }
}
