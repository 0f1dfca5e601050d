// Time-tracking core: the lifecycle of one worker's active time entry
// (start -> pause/resume cycles -> stop) and its duration accounting.

pub mod entry;
pub mod error;
pub mod manager;
pub mod store;

pub use entry::TimeEntry;
pub use error::TimeclockError;
pub use manager::{TimeclockConfig, TimeclockManager};
pub use store::{EntryStore, SqliteEntryStore};
