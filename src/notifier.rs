use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;

/// Which collection changed. Serialized values match what the scheduling
/// client expects in its refetch trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Users,
    Shifts,
    TimeEntries,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
}

/// Best-effort fan-out to connected WebSocket clients. Sending never fails
/// the mutation that triggered it; with no client connected the event is
/// simply dropped.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(128);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn notify(&self, kind: ChangeKind) {
        let event = ChangeEvent {
            kind,
            timestamp: Utc::now(),
        };
        if self.tx.send(event).is_err() {
            debug!("no websocket clients connected, change event dropped");
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_without_subscribers_is_harmless() {
        let notifier = ChangeNotifier::new();
        notifier.notify(ChangeKind::Users);
    }

    #[test]
    fn subscribers_receive_typed_events() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(ChangeKind::Shifts);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, ChangeKind::Shifts);
    }

    #[test]
    fn events_serialize_in_the_legacy_broadcast_shape() {
        let event = ChangeEvent {
            kind: ChangeKind::TimeEntries,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "timeEntries");
        assert!(value.get("timestamp").is_some());
    }
}
