use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::entry::TimeEntry;
use super::error::TimeclockError;

/// Persistence collaborator for time entries. Every mutating lifecycle
/// operation saves through this seam before it is considered committed.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Stores or updates an entry by id.
    async fn save(&self, entry: &TimeEntry) -> Result<(), TimeclockError>;

    /// Returns all entries without an end time, oldest first.
    async fn load_active(&self) -> Result<Vec<TimeEntry>, TimeclockError>;
}

/// SQLite-backed store used by the running service.
pub struct SqliteEntryStore {
    pool: SqlitePool,
}

impl SqliteEntryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn save(&self, entry: &TimeEntry) -> Result<(), TimeclockError> {
        sqlx::query(
            "INSERT INTO time_entries \
                 (id, user_id, date, start_time, end_time, pause_duration, pause_start, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                 end_time = excluded.end_time, \
                 pause_duration = excluded.pause_duration, \
                 pause_start = excluded.pause_start",
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.date)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.pause_duration)
        .bind(entry.pause_start)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_active(&self) -> Result<Vec<TimeEntry>, TimeclockError> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            "SELECT id, user_id, date, start_time, end_time, pause_duration, pause_start \
             FROM time_entries \
             WHERE end_time IS NULL \
             ORDER BY start_time",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{Duration, TimeZone, Utc};

    async fn memory_store() -> SqliteEntryStore {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        db::init_schema(&pool).await.unwrap();
        SqliteEntryStore::new(pool)
    }

    #[tokio::test]
    async fn save_then_load_active_round_trips() {
        let store = memory_store().await;
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        let entry = TimeEntry::new("worker-1", now);

        store.save(&entry).await.unwrap();

        let active = store.load_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, entry.id);
        assert_eq!(active[0].user_id, "worker-1");
        assert_eq!(active[0].start_time, now);
        assert_eq!(active[0].pause_duration, 0);
    }

    #[tokio::test]
    async fn saving_again_updates_in_place() {
        let store = memory_store().await;
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        let mut entry = TimeEntry::new("worker-1", now);
        store.save(&entry).await.unwrap();

        entry.pause_duration = Duration::minutes(5).num_milliseconds();
        entry.pause_start = Some(now + Duration::minutes(20));
        store.save(&entry).await.unwrap();

        let active = store.load_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(
            active[0].pause_duration,
            Duration::minutes(5).num_milliseconds()
        );
        assert_eq!(active[0].pause_start, Some(now + Duration::minutes(20)));
    }

    #[tokio::test]
    async fn stopped_entries_are_not_loaded_as_active() {
        let store = memory_store().await;
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        let mut entry = TimeEntry::new("worker-1", now);
        store.save(&entry).await.unwrap();

        entry.end_time = Some(now + Duration::hours(8));
        store.save(&entry).await.unwrap();

        assert!(store.load_active().await.unwrap().is_empty());
    }
}
