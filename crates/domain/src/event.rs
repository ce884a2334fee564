//! Event — an immutable record raised towards the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Someone pressed the physical button of a fingerbot.
    FingerbotButtonPressed,
    /// The debounced connection state of a device changed.
    ConnectionChanged,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FingerbotButtonPressed => "fingerbot_button_pressed",
            Self::ConnectionChanged => "connection_changed",
        })
    }
}

/// Event published on the host event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    #[must_use]
    pub fn new(event_type: EventType, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            data,
            timestamp: now(),
        }
    }

    /// Physical fingerbot press carrying the device address and id.
    #[must_use]
    pub fn fingerbot_button_pressed(address: &str, device_id: &str) -> Self {
        Self::new(
            EventType::FingerbotButtonPressed,
            serde_json::json!({ "address": address, "device_id": device_id }),
        )
    }

    /// Debounced connection transition of a device.
    #[must_use]
    pub fn connection_changed(address: &str, connected: bool) -> Self {
        Self::new(
            EventType::ConnectionChanged,
            serde_json::json!({ "address": address, "connected": connected }),
        )
    }
}
