//! # Topic bus seam and an in-process implementation.
//!
//! [`TopicBus`] is the contract with the external publish/subscribe bus.
//! Delivery guarantees, reconnection, and topic routing are the broker's
//! concern; the monitor assumes a reliable at-least-once channel and never
//! awaits publish completion.
//!
//! [`MemoryTopicBus`] stands in for the real broker: a broadcast channel of
//! `(topic, payload)` messages with a per-subscription forwarding worker
//! that filters by topic into a bounded queue.
//!
//! ## Diagram
//! ```text
//!   publish(topic, payload)
//!        │
//!        ▼
//!   broadcast channel ──► filter worker (topic A) ──► [queue] ──► consumer A
//!                     └─► filter worker (topic B) ──► [queue] ──► consumer B
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::error::RuntimeError;

/// Topic the crash verdict is published on.
pub const CRASH_EVENT_TOPIC: &str = "crashdetect/crashed";

/// Topic acknowledgments arrive on.
///
/// The payload is opaque: its content is never inspected, only its arrival
/// matters.
pub const CRASH_ACK_TOPIC: &str = "crashdetect/crashed/response";

/// Contract with the publish/subscribe bus.
#[async_trait]
pub trait TopicBus: Send + Sync + 'static {
    /// Publishes a payload on a topic.
    ///
    /// Non-blocking and fire-and-forget: completion is never awaited and
    /// failures are not surfaced to the caller.
    fn publish(&self, topic: &str, payload: String);

    /// Subscribes to a topic, returning a queue of raw payloads.
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<String>, RuntimeError>;
}

/// One message on the in-process bus.
#[derive(Clone, Debug)]
struct TopicMessage {
    topic: Arc<str>,
    payload: Arc<str>,
}

/// In-process topic bus over [`tokio::sync::broadcast`].
///
/// ### Properties
/// - **Non-blocking**: `publish` returns immediately.
/// - **Fire-and-forget**: a message with no subscribers is dropped.
/// - **Lag drops oldest**: a slow subscription skips over missed messages.
pub struct MemoryTopicBus {
    tx: broadcast::Sender<TopicMessage>,
    queue_capacity: usize,
}

impl MemoryTopicBus {
    /// Creates a new bus; `capacity` bounds both the broadcast ring and the
    /// per-subscription queues (clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Arc<Self> {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel(capacity);
        Arc::new(Self {
            tx,
            queue_capacity: capacity,
        })
    }
}

#[async_trait]
impl TopicBus for MemoryTopicBus {
    fn publish(&self, topic: &str, payload: String) {
        let _ = self.tx.send(TopicMessage {
            topic: topic.into(),
            payload: payload.into(),
        });
    }

    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<String>, RuntimeError> {
        let mut rx = self.tx.subscribe();
        let (out_tx, out_rx) = mpsc::channel(self.queue_capacity);
        let want: Arc<str> = topic.into();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if msg.topic != want {
                            continue;
                        }
                        if out_tx.send(msg.payload.to_string()).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        });

        Ok(out_rx)
    }
}
