use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::models::shift::Shift;
use crate::notifier::{ChangeKind, ChangeNotifier};

use super::shift_models::{
    CreateShiftRequest, CreateShiftResponse, ShiftMutationResponse, ShiftResponse,
    UpdateShiftRequest,
};

const SELECT_SHIFTS: &str =
    "SELECT id, employee_id, employee_name, date, start_time, end_time, location, shift_type, \
     notes, status, viewed_by, created_at FROM shifts";

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ShiftMutationResponse {
        success: false,
        message: "Authentication required".into(),
    })
}

// Get all shifts
pub async fn get_shifts(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected shifts request: {}", e);
        return unauthorized();
    }

    let shifts = sqlx::query_as::<_, Shift>(SELECT_SHIFTS)
        .fetch_all(pool.get_ref())
        .await;

    match shifts {
        Ok(shifts) => {
            let shifts: Vec<ShiftResponse> = shifts.into_iter().map(ShiftResponse::from).collect();
            HttpResponse::Ok().json(shifts)
        }
        Err(e) => {
            error!("Failed to fetch shifts: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Create a shift
pub async fn create_shift(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    request: web::Json<CreateShiftRequest>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected create shift request: {}", e);
        return unauthorized();
    }

    let request = request.into_inner();
    let id = request.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let status = request.status.unwrap_or_else(|| "geplant".to_string());
    let viewed_by = serde_json::to_string(&request.viewed_by.unwrap_or_default())
        .unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        "INSERT INTO shifts (id, employee_id, employee_name, date, start_time, end_time, location, \
                             shift_type, notes, status, viewed_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&request.employee_id)
    .bind(&request.employee_name)
    .bind(&request.date)
    .bind(&request.start_time)
    .bind(&request.end_time)
    .bind(&request.location)
    .bind(&request.shift_type)
    .bind(&request.notes)
    .bind(&status)
    .bind(viewed_by)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!("Shift {} created", id);
            notifier.notify(ChangeKind::Shifts);
            HttpResponse::Ok().json(CreateShiftResponse { success: true, id })
        }
        Err(e) => {
            error!("Failed to create shift: {}", e);
            HttpResponse::BadRequest().json(ShiftMutationResponse {
                success: false,
                message: "Shift could not be created".into(),
            })
        }
    }
}

// Update a shift
pub async fn update_shift(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateShiftRequest>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected update shift request: {}", e);
        return unauthorized();
    }

    let id = path.into_inner();
    let viewed_by = serde_json::to_string(&request.viewed_by.clone().unwrap_or_default())
        .unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        "UPDATE shifts SET employee_id = ?, employee_name = ?, date = ?, start_time = ?, \
         end_time = ?, location = ?, shift_type = ?, notes = ?, status = ?, viewed_by = ? \
         WHERE id = ?",
    )
    .bind(&request.employee_id)
    .bind(&request.employee_name)
    .bind(&request.date)
    .bind(&request.start_time)
    .bind(&request.end_time)
    .bind(&request.location)
    .bind(&request.shift_type)
    .bind(&request.notes)
    .bind(&request.status)
    .bind(viewed_by)
    .bind(&id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            notifier.notify(ChangeKind::Shifts);
            HttpResponse::Ok().json(ShiftMutationResponse {
                success: true,
                message: "Shift updated".into(),
            })
        }
        Err(e) => {
            error!("Failed to update shift {}: {}", id, e);
            HttpResponse::InternalServerError().json(ShiftMutationResponse {
                success: false,
                message: "Update failed".into(),
            })
        }
    }
}

// Delete a shift
pub async fn delete_shift(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    notifier: web::Data<ChangeNotifier>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected delete shift request: {}", e);
        return unauthorized();
    }

    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM shifts WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            notifier.notify(ChangeKind::Shifts);
            HttpResponse::Ok().json(ShiftMutationResponse {
                success: true,
                message: "Shift deleted".into(),
            })
        }
        Err(e) => {
            error!("Failed to delete shift {}: {}", id, e);
            HttpResponse::InternalServerError().json(ShiftMutationResponse {
                success: false,
                message: "Delete failed".into(),
            })
        }
    }
}
