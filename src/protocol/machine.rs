//! # Acknowledge-to-clear state machine.
//!
//! [`CrashProtocol`] owns the single process-wide [`CrashStatus`] and is
//! the only component that reads or writes it. A transition and the publish
//! it causes happen under one guard, so listeners racing from `Clear`
//! cannot lose an update.
//!
//! ## Transitions
//! ```text
//! Clear    ──(trigger)────────► Detected   publish {"status":1}
//! Detected ──(trigger)────────► Detected   publish {"status":1}   (re-announce)
//! Detected ──(acknowledgment)─► Clear      publish {"status":0}
//! Clear    ──(acknowledgment)─► Clear      publish {"status":0}   (unconditional)
//! ```
//!
//! ## Rules
//! - Initial state is `Clear`; there is no terminal state.
//! - Every trigger re-publishes, even while already `Detected`.
//! - Acknowledgment handling never inspects the prior state.
//! - Publishing is fire-and-forget; completion is never awaited.
//! - No timeout while waiting for an acknowledgment: `Detected` persists
//!   until one arrives, indefinitely if it never does.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::detect::is_crash_trigger;
use crate::events::{Bus, Event, EventKind};
use crate::signals::SignalSample;
use crate::transport::{TopicBus, CRASH_EVENT_TOPIC};

use super::event::{CrashEvent, CrashStatus};

/// Guarded crash verdict and its publishing side effects.
pub struct CrashProtocol {
    /// The one current verdict. Guarded; transitions and their publishes
    /// are atomic as a unit.
    status: Mutex<CrashStatus>,
    /// Outbound bus for the crash-event topic.
    topics: Arc<dyn TopicBus>,
    /// Internal observability bus.
    events: Bus,
}

impl CrashProtocol {
    /// Creates a protocol in the `Clear` state.
    pub fn new(topics: Arc<dyn TopicBus>, events: Bus) -> Self {
        Self {
            status: Mutex::new(CrashStatus::Clear),
            topics,
            events,
        }
    }

    /// Handles one telemetry sample.
    ///
    /// Non-triggering samples are observed and discarded. A triggering
    /// sample sets the verdict to `Detected` and publishes `{"status":1}`,
    /// whatever the verdict was before.
    pub async fn on_sample(&self, sample: &SignalSample) {
        self.events.publish(
            Event::new(EventKind::SampleObserved)
                .with_path(sample.path().as_str())
                .with_value(sample.as_f64()),
        );
        if !is_crash_trigger(sample) {
            return;
        }
        self.events.publish(
            Event::new(EventKind::TriggerFired)
                .with_path(sample.path().as_str())
                .with_value(sample.as_f64()),
        );

        let mut status = self.status.lock().await;
        *status = CrashStatus::Detected;
        self.announce(CrashStatus::Detected);
    }

    /// Handles an acknowledgment arrival.
    ///
    /// Unconditional: clears the verdict and publishes `{"status":0}`
    /// regardless of the prior state.
    pub async fn on_acknowledgment(&self) {
        self.events.publish(Event::new(EventKind::AckReceived));

        let mut status = self.status.lock().await;
        *status = CrashStatus::Clear;
        self.announce(CrashStatus::Clear);
    }

    /// Snapshot of the current verdict.
    pub async fn status(&self) -> CrashStatus {
        *self.status.lock().await
    }

    /// Publishes the verdict on the crash-event topic and mirrors it on the
    /// internal bus. Called with the status guard held.
    fn announce(&self, status: CrashStatus) {
        self.topics
            .publish(CRASH_EVENT_TOPIC, CrashEvent::new(status).to_payload());

        let kind = match status {
            CrashStatus::Detected => EventKind::CrashAnnounced,
            CrashStatus::Clear => EventKind::CrashCleared,
        };
        self.events
            .publish(Event::new(kind).with_status(status.as_code()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use crate::error::RuntimeError;

    use super::*;

    /// Records publishes synchronously so assertions are deterministic.
    struct RecordingBus {
        published: StdMutex<Vec<(String, String)>>,
    }

    impl RecordingBus {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                published: StdMutex::new(Vec::new()),
            })
        }

        fn payloads(&self, topic: &str) -> Vec<String> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| t == topic)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    #[async_trait]
    impl TopicBus for RecordingBus {
        fn publish(&self, topic: &str, payload: String) {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload));
        }

        async fn subscribe(&self, _topic: &str) -> Result<mpsc::Receiver<String>, RuntimeError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }
    }

    fn protocol(bus: &Arc<RecordingBus>) -> CrashProtocol {
        CrashProtocol::new(Arc::clone(bus) as Arc<dyn TopicBus>, Bus::new(64))
    }

    const DETECTED: &str = r#"{"result":{"status":1}}"#;
    const CLEAR: &str = r#"{"result":{"status":0}}"#;

    #[tokio::test]
    async fn test_trigger_publishes_detected_once_per_sample() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        proto
            .on_sample(&SignalSample::LongitudinalAcceleration(-60.0))
            .await;

        assert_eq!(bus.payloads(CRASH_EVENT_TOPIC), vec![DETECTED.to_string()]);
        assert_eq!(proto.status().await, CrashStatus::Detected);
    }

    #[tokio::test]
    async fn test_non_trigger_publishes_nothing() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        for a in [-50.0, 0.0, 50.0] {
            proto
                .on_sample(&SignalSample::LongitudinalAcceleration(a))
                .await;
        }
        proto.on_sample(&SignalSample::ObstacleWarning(false)).await;

        assert!(bus.payloads(CRASH_EVENT_TOPIC).is_empty());
        assert_eq!(proto.status().await, CrashStatus::Clear);
    }

    #[tokio::test]
    async fn test_repeat_triggers_are_not_deduplicated() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        proto.on_sample(&SignalSample::ObstacleWarning(true)).await;
        proto.on_sample(&SignalSample::ObstacleWarning(true)).await;

        assert_eq!(
            bus.payloads(CRASH_EVENT_TOPIC),
            vec![DETECTED.to_string(), DETECTED.to_string()]
        );
    }

    #[tokio::test]
    async fn test_acknowledgment_clears_and_publishes() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        proto
            .on_sample(&SignalSample::LongitudinalAcceleration(-60.0))
            .await;
        proto
            .on_sample(&SignalSample::LongitudinalAcceleration(10.0))
            .await;
        proto.on_acknowledgment().await;

        assert_eq!(
            bus.payloads(CRASH_EVENT_TOPIC),
            vec![DETECTED.to_string(), CLEAR.to_string()]
        );
        assert_eq!(proto.status().await, CrashStatus::Clear);
    }

    #[tokio::test]
    async fn test_acknowledgment_from_clear_still_publishes() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        proto.on_acknowledgment().await;

        assert_eq!(bus.payloads(CRASH_EVENT_TOPIC), vec![CLEAR.to_string()]);
        assert_eq!(proto.status().await, CrashStatus::Clear);
    }

    #[tokio::test]
    async fn test_detected_persists_without_acknowledgment() {
        let bus = RecordingBus::new();
        let proto = protocol(&bus);

        proto
            .on_sample(&SignalSample::LongitudinalAcceleration(70.0))
            .await;

        assert_eq!(bus.payloads(CRASH_EVENT_TOPIC), vec![DETECTED.to_string()]);
        // No acknowledgment ever arrives: the verdict stays put.
        assert_eq!(proto.status().await, CrashStatus::Detected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_triggers_lose_no_update() {
        let bus = RecordingBus::new();
        let proto = Arc::new(protocol(&bus));

        let a = {
            let p = Arc::clone(&proto);
            tokio::spawn(async move {
                p.on_sample(&SignalSample::LongitudinalAcceleration(-60.0))
                    .await;
            })
        };
        let b = {
            let p = Arc::clone(&proto);
            tokio::spawn(
                async move { p.on_sample(&SignalSample::ObstacleWarning(true)).await },
            )
        };
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(
            bus.payloads(CRASH_EVENT_TOPIC),
            vec![DETECTED.to_string(), DETECTED.to_string()]
        );
        assert_eq!(proto.status().await, CrashStatus::Detected);
    }
}
