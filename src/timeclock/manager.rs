use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::Mutex;

use crate::notifier::{ChangeKind, ChangeNotifier};

use super::entry::{clamp_non_negative, TimeEntry};
use super::error::TimeclockError;
use super::store::EntryStore;

#[derive(Debug, Clone, Copy)]
pub struct TimeclockConfig {
    /// Credit a still-open pause into `pause_duration` when an entry is
    /// stopped. Off by default: stopping during a pause drops the open
    /// interval without credit, which is what the legacy scheduling client
    /// has always done and what its stored history reflects.
    pub fold_open_pause_on_stop: bool,
}

impl Default for TimeclockConfig {
    fn default() -> Self {
        Self {
            fold_open_pause_on_stop: false,
        }
    }
}

/// At most one active entry per worker, guarded by that worker's slot mutex.
type WorkerSlot = Arc<Mutex<Option<TimeEntry>>>;

/// Owns the start / pause-resume / stop transitions of each worker's active
/// time entry. Operations on one worker are linearized through its slot;
/// operations on different workers proceed independently. In-memory state is
/// only updated after the store accepted the change, so a failed save leaves
/// the manager and the stored record in agreement.
pub struct TimeclockManager {
    store: Arc<dyn EntryStore>,
    notifier: ChangeNotifier,
    config: TimeclockConfig,
    slots: Mutex<HashMap<String, WorkerSlot>>,
}

impl TimeclockManager {
    pub fn new(
        store: Arc<dyn EntryStore>,
        notifier: ChangeNotifier,
        config: TimeclockConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Rebuilds the active-entry map from the store. Called once at startup;
    /// returns the number of restored entries.
    pub async fn restore(&self) -> Result<usize, TimeclockError> {
        let entries = self.store.load_active().await?;
        let mut restored = 0;
        for entry in entries {
            let slot = self.slot(&entry.user_id).await;
            let mut active = slot.lock().await;
            match active.as_ref() {
                None => {
                    *active = Some(entry);
                    restored += 1;
                }
                Some(kept) => {
                    // Legacy data can hold several open entries per user;
                    // only the oldest one keeps running.
                    warn!(
                        "user {} has more than one open time entry, keeping {} and ignoring {}",
                        entry.user_id, kept.id, entry.id
                    );
                }
            }
        }
        Ok(restored)
    }

    /// Begins a new work session for `worker_id`.
    pub async fn start(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, TimeclockError> {
        let slot = self.slot(worker_id).await;
        let mut active = slot.lock().await;
        if active.is_some() {
            return Err(TimeclockError::AlreadyActive);
        }

        let entry = TimeEntry::new(worker_id, now);
        self.store.save(&entry).await?;
        *active = Some(entry.clone());

        info!("time entry {} started for user {}", entry.id, worker_id);
        self.notifier.notify(ChangeKind::TimeEntries);
        Ok(entry)
    }

    /// Toggles the pause state of the worker's active entry. Pausing records
    /// the pause start; resuming credits the completed interval into
    /// `pause_duration`.
    pub async fn pause_or_resume(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, TimeclockError> {
        let slot = self.slot(worker_id).await;
        let mut active = slot.lock().await;
        let current = active.as_ref().ok_or(TimeclockError::NoActiveEntry)?;

        let mut updated = current.clone();
        match updated.pause_start.take() {
            Some(pause_start) => {
                let elapsed = clamp_non_negative(now - pause_start);
                updated.pause_duration += elapsed.num_milliseconds();
                info!(
                    "time entry {} resumed for user {} after {}ms",
                    updated.id,
                    worker_id,
                    elapsed.num_milliseconds()
                );
            }
            None => {
                updated.pause_start = Some(now);
                info!("time entry {} paused for user {}", updated.id, worker_id);
            }
        }

        self.store.save(&updated).await?;
        *active = Some(updated.clone());

        self.notifier.notify(ChangeKind::TimeEntries);
        Ok(updated)
    }

    /// Ends the worker's active session. A pause left open at this point is
    /// cleared; whether its elapsed time is credited depends on
    /// `TimeclockConfig::fold_open_pause_on_stop`.
    pub async fn stop(
        &self,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, TimeclockError> {
        let slot = self.slot(worker_id).await;
        let mut active = slot.lock().await;
        let current = active.as_ref().ok_or(TimeclockError::NoActiveEntry)?;

        let mut finished = current.clone();
        if let Some(pause_start) = finished.pause_start.take() {
            if self.config.fold_open_pause_on_stop {
                let elapsed = clamp_non_negative(now - pause_start);
                finished.pause_duration += elapsed.num_milliseconds();
            } else {
                warn!(
                    "time entry {} stopped during a pause, open interval dropped",
                    finished.id
                );
            }
        }
        finished.end_time = Some(now);

        self.store.save(&finished).await?;
        *active = None;

        info!("time entry {} stopped for user {}", finished.id, worker_id);
        self.notifier.notify(ChangeKind::TimeEntries);
        Ok(finished)
    }

    /// The worker's currently running entry, if any.
    pub async fn active_entry(&self, worker_id: &str) -> Option<TimeEntry> {
        let slot = self.slot(worker_id).await;
        let active = slot.lock().await;
        active.clone()
    }

    async fn slot(&self, worker_id: &str) -> WorkerSlot {
        let mut slots = self.slots.lock().await;
        slots.entry(worker_id.to_string()).or_default().clone()
    }
}
