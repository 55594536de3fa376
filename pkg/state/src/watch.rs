use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Type of event in the watch stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Put,
    Delete,
}

/// A single watch event representing a state change.
///
/// `value` is the object as written for `Put` events, and the last stored
/// object for `Delete` events: consumers reclaiming on deletion need the
/// content of what disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEvent {
    pub seq: u64,
    pub event_type: EventType,
    pub key: String,
    #[serde(default)]
    pub value: Option<Vec<u8>>,
}

/// Change stream over all state mutations, with monotonic sequence numbers.
/// Every StateStore put/delete is broadcast to all subscribers.
#[derive(Clone)]
pub struct EventLog {
    seq: Arc<AtomicU64>,
    sender: broadcast::Sender<WatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self {
            seq: Arc::new(AtomicU64::new(0)),
            sender,
        }
    }

    /// Record a new event. Called internally by StateStore on put/delete.
    pub fn emit(&self, event_type: EventType, key: String, value: Option<Vec<u8>>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        // Ignore send errors: no receivers means nobody is watching.
        let _ = self.sender.send(WatchEvent {
            seq,
            event_type,
            key,
            value,
        });
    }

    /// Subscribe to receive new events as they are emitted.
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let log = EventLog::new();
        let mut rx = log.subscribe();

        log.emit(EventType::Put, "/registry/tenants/acme".to_string(), None);
        log.emit(EventType::Delete, "/registry/tenants/acme".to_string(), None);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Put);
        assert_eq!(first.seq, 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Delete);
        assert_eq!(second.seq, 2);
    }
}
