use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One work session for one worker. Field names follow the wire format the
/// scheduling client already speaks (`userId`, `startTime`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Accumulated paused time in milliseconds. Only completed pause
    /// intervals are credited here.
    pub pause_duration: i64,
    pub pause_start: Option<DateTime<Utc>>,
}

impl TimeEntry {
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date: now.date_naive().to_string(),
            start_time: now,
            end_time: None,
            pause_duration: 0,
            pause_start: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_paused(&self) -> bool {
        self.is_active() && self.pause_start.is_some()
    }

    /// Net worked time: wall-clock span minus credited pauses and, while the
    /// entry is active, minus the currently open pause. Never negative.
    pub fn worked_duration(&self, now: DateTime<Utc>) -> Duration {
        let effective_end = self.end_time.unwrap_or(now);
        let open_pause = match (self.end_time, self.pause_start) {
            (None, Some(pause_start)) => clamp_non_negative(now - pause_start),
            _ => Duration::zero(),
        };
        let worked = effective_end - self.start_time
            - Duration::milliseconds(self.pause_duration)
            - open_pause;
        clamp_non_negative(worked)
    }
}

/// Duration math takes `now` from an external clock, so negative deltas are
/// possible under skew and must not propagate.
pub fn clamp_non_negative(duration: Duration) -> Duration {
    if duration < Duration::zero() {
        Duration::zero()
    } else {
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
    }

    fn minutes(m: i64) -> Duration {
        Duration::minutes(m)
    }

    #[test]
    fn new_entry_starts_active_and_unpaused() {
        let entry = TimeEntry::new("worker-1", t0());
        assert!(entry.is_active());
        assert!(!entry.is_paused());
        assert_eq!(entry.date, "2024-05-06");
        assert_eq!(entry.start_time, t0());
        assert_eq!(entry.pause_duration, 0);
        assert!(entry.end_time.is_none());
        assert!(entry.pause_start.is_none());
    }

    #[test]
    fn worked_duration_of_running_entry_tracks_now() {
        let entry = TimeEntry::new("worker-1", t0());
        assert_eq!(entry.worked_duration(t0() + minutes(30)), minutes(30));
    }

    #[test]
    fn worked_duration_subtracts_open_pause_while_active() {
        let mut entry = TimeEntry::new("worker-1", t0());
        entry.pause_start = Some(t0() + minutes(10));
        assert_eq!(entry.worked_duration(t0() + minutes(25)), minutes(10));
    }

    #[test]
    fn worked_duration_of_stopped_entry_ignores_leftover_pause_start() {
        let mut entry = TimeEntry::new("worker-1", t0());
        entry.pause_duration = minutes(5).num_milliseconds();
        entry.end_time = Some(t0() + minutes(60));
        // A stopped entry should never carry pause_start, but malformed rows
        // must not skew the report.
        entry.pause_start = Some(t0() + minutes(50));
        assert_eq!(entry.worked_duration(t0() + minutes(90)), minutes(55));
    }

    #[test]
    fn worked_duration_never_goes_negative() {
        let mut entry = TimeEntry::new("worker-1", t0());
        entry.pause_duration = minutes(120).num_milliseconds();
        entry.end_time = Some(t0() + minutes(60));
        assert_eq!(entry.worked_duration(t0() + minutes(60)), Duration::zero());

        // Clock skew: now before start_time.
        let skewed = TimeEntry::new("worker-1", t0());
        assert_eq!(skewed.worked_duration(t0() - minutes(5)), Duration::zero());
    }

    #[test]
    fn serializes_with_legacy_client_field_names() {
        let entry = TimeEntry::new("worker-1", t0());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["userId"], "worker-1");
        assert!(value.get("startTime").is_some());
        assert_eq!(value["pauseDuration"], 0);
        assert!(value["endTime"].is_null());
        assert!(value["pauseStart"].is_null());
    }
}
