//! # Runtime events emitted by the monitor and its listeners.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Sample flow**: telemetry arriving, triggers firing, verdicts leaving
//! - **Subscriber plumbing**: per-subscriber queue overflow and panics
//! - **Shutdown**: termination signal handling and grace accounting
//!
//! The [`Event`] struct carries optional metadata such as the signal path,
//! the sample value, and the published status code.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use crashvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TriggerFired)
//!     .with_path("Vehicle.Acceleration.Longitudinal")
//!     .with_value(-60.0);
//!
//! assert_eq!(ev.kind, EventKind::TriggerFired);
//! assert_eq!(ev.value, Some(-60.0));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Sample flow ===
    /// The monitor started and its listeners are being registered.
    ///
    /// Sets: `at`, `seq`
    MonitorStarted,

    /// A telemetry sample was delivered to the protocol.
    ///
    /// Sets: `path`, `value`, `at`, `seq`
    SampleObserved,

    /// A sample satisfied the crash predicate.
    ///
    /// Sets: `path`, `value`, `at`, `seq`
    TriggerFired,

    /// `{"status":1}` was published on the crash-event topic.
    ///
    /// Sets: `status` (=1), `at`, `seq`
    CrashAnnounced,

    /// `{"status":0}` was published on the crash-event topic.
    ///
    /// Sets: `status` (=0), `at`, `seq`
    CrashCleared,

    /// An acknowledgment arrived on the acknowledgment topic.
    ///
    /// Sets: `at`, `seq`
    AckReceived,

    /// A listener's upstream queue ended (stream producer went away).
    ///
    /// Sets: `path` (signal path or topic name), `at`, `seq`
    StreamClosed,

    // === Subscriber plumbing ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `path` (subscriber name), `reason`, `at`, `seq`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `path` (subscriber name), `reason`, `at`, `seq`
    SubscriberOverflow,

    // === Shutdown ===
    /// Shutdown requested (OS signal observed).
    ///
    /// Sets: `at`, `seq`
    ShutdownRequested,

    /// All listeners stopped within the configured grace period.
    ///
    /// Sets: `at`, `seq`
    AllStoppedWithin,

    /// Grace period exceeded; some listeners did not stop in time.
    ///
    /// Sets: `at`, `seq`
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Signal path, topic, or subscriber name the event concerns.
    pub path: Option<Arc<str>>,
    /// Sample value (warning flag rendered as 0/1).
    pub value: Option<f64>,
    /// Published status code (0 = clear, 1 = detected).
    pub status: Option<u8>,
    /// Human-readable reason (overflow details, panic info).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            path: None,
            value: None,
            status: None,
            reason: None,
        }
    }

    /// Attaches a signal path, topic, or subscriber name.
    #[inline]
    pub fn with_path(mut self, path: impl Into<Arc<str>>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches a sample value.
    #[inline]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a published status code.
    #[inline]
    pub fn with_status(mut self, status: u8) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_path(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_path(subscriber)
            .with_reason(info)
    }

    /// True for overflow reports from the subscriber plumbing.
    ///
    /// The [`SubscriberSet`](crate::SubscriberSet) checks this before
    /// re-reporting a dropped event, to keep plumbing reports from feeding
    /// back into the queue that is already full.
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for panic reports from the subscriber plumbing.
    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let a = Event::new(EventKind::SampleObserved);
        let b = Event::new(EventKind::SampleObserved);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::CrashAnnounced)
            .with_status(1)
            .with_reason("demo");
        assert_eq!(ev.status, Some(1));
        assert_eq!(ev.reason.as_deref(), Some("demo"));
    }
}
