use serde::Serialize;

use crate::timeclock::TimeEntry;

#[derive(Serialize)]
pub struct TimeEntryMutationResponse {
    pub success: bool,
    pub message: String,
}

// The caller's running entry, if any, with its live net worked time.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEntryResponse {
    pub active: bool,
    pub entry: Option<TimeEntry>,
    pub worked_ms: Option<i64>,
}

impl ActiveEntryResponse {
    pub fn none() -> Self {
        Self {
            active: false,
            entry: None,
            worked_ms: None,
        }
    }

    pub fn running(entry: TimeEntry, worked_ms: i64) -> Self {
        Self {
            active: true,
            entry: Some(entry),
            worked_ms: Some(worked_ms),
        }
    }
}
