use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use sqlx::SqlitePool;

use crate::auth::Authenticator;
use crate::timeclock::{TimeEntry, TimeclockError, TimeclockManager};

use super::time_entry_models::{ActiveEntryResponse, TimeEntryMutationResponse};

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(TimeEntryMutationResponse {
        success: false,
        message: "Authentication required".into(),
    })
}

fn lifecycle_failure(err: TimeclockError) -> HttpResponse {
    match err {
        TimeclockError::AlreadyActive => HttpResponse::Conflict().json(TimeEntryMutationResponse {
            success: false,
            message: "An active time entry already exists".into(),
        }),
        TimeclockError::NoActiveEntry => HttpResponse::Conflict().json(TimeEntryMutationResponse {
            success: false,
            message: "No active time entry".into(),
        }),
        TimeclockError::Persistence(e) => {
            error!("Failed to persist time entry: {}", e);
            HttpResponse::InternalServerError().json(TimeEntryMutationResponse {
                success: false,
                message: "Failed to save time entry".into(),
            })
        }
    }
}

// Get the full time entry history
pub async fn get_time_entries(
    pool: web::Data<SqlitePool>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(e) = auth.authenticate(&req) {
        info!("Rejected time entries request: {}", e);
        return unauthorized();
    }

    let entries = sqlx::query_as::<_, TimeEntry>(
        "SELECT id, user_id, date, start_time, end_time, pause_duration, pause_start \
         FROM time_entries ORDER BY start_time",
    )
    .fetch_all(pool.get_ref())
    .await;

    match entries {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => {
            error!("Failed to fetch time entries: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Get the caller's running entry with its live worked duration
pub async fn get_active_entry(
    manager: web::Data<TimeclockManager>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    let claims = match auth.authenticate(&req) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Rejected active entry request: {}", e);
            return unauthorized();
        }
    };

    match manager.active_entry(&claims.sub).await {
        Some(entry) => {
            let worked_ms = entry.worked_duration(Utc::now()).num_milliseconds();
            HttpResponse::Ok().json(ActiveEntryResponse::running(entry, worked_ms))
        }
        None => HttpResponse::Ok().json(ActiveEntryResponse::none()),
    }
}

// Start a new work session for the caller
pub async fn start_entry(
    manager: web::Data<TimeclockManager>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    let claims = match auth.authenticate(&req) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Rejected start request: {}", e);
            return unauthorized();
        }
    };

    match manager.start(&claims.sub, Utc::now()).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => lifecycle_failure(e),
    }
}

// Toggle pause/resume on the caller's running session
pub async fn pause_entry(
    manager: web::Data<TimeclockManager>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    let claims = match auth.authenticate(&req) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Rejected pause request: {}", e);
            return unauthorized();
        }
    };

    match manager.pause_or_resume(&claims.sub, Utc::now()).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => lifecycle_failure(e),
    }
}

// End the caller's running session
pub async fn stop_entry(
    manager: web::Data<TimeclockManager>,
    auth: web::Data<Authenticator>,
    req: HttpRequest,
) -> impl Responder {
    let claims = match auth.authenticate(&req) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Rejected stop request: {}", e);
            return unauthorized();
        }
    };

    match manager.stop(&claims.sub, Utc::now()).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => lifecycle_failure(e),
    }
}
