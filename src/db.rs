use std::str::FromStr;

use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::config::AppConfig;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Foreign keys stay off: the schema documents the references, but users
    // must be deletable while their append-only time entry history remains.
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Creates the tables on first start. Entries reference their owning user;
/// time entries are append-only history and have no delete path.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT,
            role TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'aktiv',
            phone TEXT,
            hours REAL NOT NULL DEFAULT 0,
            permissions TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS shifts (
            id TEXT PRIMARY KEY,
            employee_id TEXT,
            employee_name TEXT,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            location TEXT NOT NULL,
            shift_type TEXT NOT NULL,
            notes TEXT,
            status TEXT NOT NULL DEFAULT 'geplant',
            viewed_by TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (employee_id) REFERENCES users(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS time_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            pause_duration INTEGER NOT NULL DEFAULT 0,
            pause_start TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seeds the admin account when it does not exist yet, so a fresh install
/// can always log in.
pub async fn ensure_default_admin(
    pool: &SqlitePool,
    config: &AppConfig,
) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(&config.admin_username)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let password_hash = hash(&config.admin_password, DEFAULT_COST)
        .map_err(|err| sqlx::Error::Protocol(format!("failed to hash admin password: {err}")))?;
    let permissions = serde_json::json!({
        "canManageShifts": true,
        "canManageEmployees": true,
        "canAssignShifts": true,
        "canViewAllShifts": true,
        "canEditOwnShifts": true,
    })
    .to_string();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, name, email, role, status, hours, permissions, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&config.admin_username)
    .bind(password_hash)
    .bind("Admin")
    .bind("admin@vgf-service.de")
    .bind("admin")
    .bind("aktiv")
    .bind(0.0_f64)
    .bind(permissions)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    info!("default admin user {} created", config.admin_username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeclock::{EntryStore, SqliteEntryStore, TimeEntry};

    async fn memory_pool() -> SqlitePool {
        let pool = connect("sqlite::memory:").await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    async fn insert_user(pool: &SqlitePool, id: &str, username: &str) {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, name, role, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind("hash")
        .bind("Marvin")
        .bind("employee")
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn deleting_a_user_keeps_their_time_entry_history() {
        let pool = memory_pool().await;
        insert_user(&pool, "user-1", "marvin").await;

        let store = SqliteEntryStore::new(pool.clone());
        let entry = TimeEntry::new("user-1", Utc::now());
        store.save(&entry).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind("user-1")
            .execute(&pool)
            .await
            .unwrap();

        let remaining =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM time_entries WHERE user_id = ?")
                .bind("user-1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn time_entries_do_not_require_a_users_row() {
        let pool = memory_pool().await;
        let store = SqliteEntryStore::new(pool);

        let entry = TimeEntry::new("worker-without-account", Utc::now());
        store.save(&entry).await.unwrap();

        let active = store.load_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].user_id, "worker-without-account");
    }
}
