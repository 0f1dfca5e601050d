use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

mod auth;
mod config;
mod db;
mod models;
mod notifier;
mod routes;
mod timeclock;

use auth::Authenticator;
use notifier::ChangeNotifier;
use timeclock::{SqliteEntryStore, TimeclockConfig, TimeclockManager};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = config::AppConfig::from_env();
    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to open database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");
    db::ensure_default_admin(&pool, &config)
        .await
        .expect("Failed to seed default admin");

    let notifier = ChangeNotifier::new();
    let manager = TimeclockManager::new(
        Arc::new(SqliteEntryStore::new(pool.clone())),
        notifier.clone(),
        TimeclockConfig::default(),
    );
    let restored = manager
        .restore()
        .await
        .expect("Failed to restore active time entries");
    if restored > 0 {
        info!("restored {} active time entries", restored);
    }

    let pool_data = web::Data::new(pool);
    let manager_data = web::Data::new(manager);
    let notifier_data = web::Data::new(notifier);
    let auth_data = web::Data::new(Authenticator::new(&config.jwt_secret));

    let server_address = config.bind_address.clone();
    println!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(pool_data.clone())
            .app_data(manager_data.clone())
            .app_data(notifier_data.clone())
            .app_data(auth_data.clone())
            .configure(routes::routes::auth_configure)
            .configure(routes::routes::user_configure)
            .configure(routes::routes::shift_configure)
            .configure(routes::routes::time_entry_configure)
            .configure(routes::routes::ws_configure)
            .configure(routes::routes::health_configure)
    })
    .bind(&server_address)?
    .run()
    .await
}
