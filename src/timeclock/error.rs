use thiserror::Error;

/// Failures the lifecycle operations can report. Retry policy belongs to the
/// caller; nothing here is retried internally.
#[derive(Debug, Error)]
pub enum TimeclockError {
    #[error("no active time entry for this user")]
    NoActiveEntry,

    #[error("an active time entry already exists for this user")]
    AlreadyActive,

    #[error("failed to persist time entry: {0}")]
    Persistence(#[from] sqlx::Error),
}
