//! Control-link synchronization hooks
//!
//! After boot, selected configuration values are pushed to the wireless
//! control link so the companion application sees the device's state
//! without polling. Notifications are fire-and-forget: the link layer
//! queues or drops them, and the KV layer never waits.

use crate::platform::traits::storage::{MAX_KEY_LEN, MAX_VALUE_LEN};
use heapless::{String, Vec};

/// Receiver of configuration change notifications
pub trait LinkSync {
    /// Push an integer value for `key` to the link
    fn sync_int(&mut self, key: &str, value: i32);

    /// Push a string value for `key` to the link
    fn sync_str(&mut self, key: &str, value: &str);
}

/// Value carried by one recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncedValue {
    Int(i32),
    Str(String<MAX_VALUE_LEN>),
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedEvent {
    pub key: String<MAX_KEY_LEN>,
    pub value: SyncedValue,
}

/// Link double recording every notification, for test verification
#[derive(Debug, Default)]
pub struct RecordingLink {
    events: Vec<SyncedEvent, 16>,
}

impl RecordingLink {
    /// Create a new recording link
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, in order
    pub fn events(&self) -> &[SyncedEvent] {
        &self.events
    }

    /// Forget all recorded notifications
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl LinkSync for RecordingLink {
    fn sync_int(&mut self, key: &str, value: i32) {
        let Ok(key) = String::<MAX_KEY_LEN>::try_from(key) else {
            return;
        };
        let _ = self.events.push(SyncedEvent {
            key,
            value: SyncedValue::Int(value),
        });
    }

    fn sync_str(&mut self, key: &str, value: &str) {
        let Ok(key) = String::<MAX_KEY_LEN>::try_from(key) else {
            return;
        };
        let Ok(value) = String::<MAX_VALUE_LEN>::try_from(value) else {
            return;
        };
        let _ = self.events.push(SyncedEvent {
            key,
            value: SyncedValue::Str(value),
        });
    }
}
