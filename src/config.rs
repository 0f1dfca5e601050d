use std::env;

/// Process configuration, read once at startup. Every value has a default so
/// the service runs out of the box; a `.env` file or real environment
/// variables override them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        Self {
            bind_address: format!("0.0.0.0:{}", port),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://vgf_database.db".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "vgf-secret-key-2024".to_string()),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "marvinVGF".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "vgf123".to_string()),
        }
    }
}
