//! # Crash event wire format.
//!
//! The verdict crosses the bus as a small self-describing JSON document:
//! `{"result":{"status":0}}` for clear, `{"result":{"status":1}}` for
//! detected. [`CrashEvent`] is that document; [`CrashStatus`] is the typed
//! verdict it carries.

use serde::{Deserialize, Serialize};

/// Most recently published crash verdict.
///
/// Exactly one value is current for the whole process; it lives inside
/// [`CrashProtocol`](crate::CrashProtocol) and starts at `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashStatus {
    /// No unacknowledged crash.
    Clear,
    /// A crash trigger fired and has not been acknowledged yet.
    Detected,
}

impl CrashStatus {
    /// Wire code: `0` for clear, `1` for detected.
    pub fn as_code(&self) -> u8 {
        match self {
            CrashStatus::Clear => 0,
            CrashStatus::Detected => 1,
        }
    }
}

/// Inner `result` object of the crash-event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashResult {
    /// Verdict code, see [`CrashStatus::as_code`].
    pub status: u8,
}

/// Payload published on the crash-event topic.
///
/// ## Example
/// ```
/// use crashvisor::{CrashEvent, CrashStatus};
///
/// let ev = CrashEvent::new(CrashStatus::Detected);
/// assert_eq!(ev.to_payload(), r#"{"result":{"status":1}}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashEvent {
    /// Result envelope, as expected by downstream consumers.
    pub result: CrashResult,
}

impl CrashEvent {
    /// Builds the payload for a verdict.
    pub fn new(status: CrashStatus) -> Self {
        Self {
            result: CrashResult {
                status: status.as_code(),
            },
        }
    }

    /// Renders the payload string published on the bus.
    pub fn to_payload(&self) -> String {
        serde_json::json!({ "result": { "status": self.result.status } }).to_string()
    }
}
