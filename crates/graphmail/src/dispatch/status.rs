//! The status sink: where the host observes the result of a send.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use super::outcome::DispatchOutcome;

/// Progress marker written at the start of every send.
pub const SENDING_MESSAGE: &str = "Sending email...";

/// The two observable slots: a success flag and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchStatus {
    pub succeeded: bool,
    pub message: String,
}

impl DispatchStatus {
    /// `(false, "")`, the state before any send.
    pub fn idle() -> Self {
        Self {
            succeeded: false,
            message: String::new(),
        }
    }

    /// `(false, "Sending email...")`
    pub fn sending() -> Self {
        Self {
            succeeded: false,
            message: SENDING_MESSAGE.to_string(),
        }
    }
}

impl From<&DispatchOutcome> for DispatchStatus {
    fn from(outcome: &DispatchOutcome) -> Self {
        Self {
            succeeded: outcome.succeeded,
            message: outcome.message.clone(),
        }
    }
}

/// Receives status updates. Each update overwrites the previous one wholesale.
pub trait StatusSink: Send + Sync {
    fn update(&self, status: &DispatchStatus);
}

/// Discards all updates.
pub struct NoopStatus;

impl StatusSink for NoopStatus {
    fn update(&self, _status: &DispatchStatus) {}
}

/// Keeps the latest status in memory.
///
/// Concurrent sends race on the same slots; the last writer wins.
pub struct StatusSlots {
    current: Mutex<DispatchStatus>,
}

impl StatusSlots {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(DispatchStatus::idle()),
        }
    }

    pub fn current(&self) -> DispatchStatus {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for StatusSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusSlots {
    fn update(&self, status: &DispatchStatus) {
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = status.clone();
    }
}

/// A status update with the time it was emitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub timestamp: DateTime<Utc>,
    pub succeeded: bool,
    pub message: String,
}

impl From<&DispatchStatus> for StatusEvent {
    fn from(status: &DispatchStatus) -> Self {
        Self {
            timestamp: Utc::now(),
            succeeded: status.succeeded,
            message: status.message.clone(),
        }
    }
}

/// Fans status updates out to any number of subscribers.
#[derive(Clone)]
pub struct BroadcastStatus {
    sender: broadcast::Sender<StatusEvent>,
}

impl BroadcastStatus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastStatus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl StatusSink for BroadcastStatus {
    fn update(&self, status: &DispatchStatus) {
        // No receivers is fine
        let _ = self.sender.send(StatusEvent::from(status));
    }
}
