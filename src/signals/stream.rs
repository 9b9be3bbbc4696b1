//! # Signal stream seam and an in-process implementation.
//!
//! [`SignalStream`] is the contract with the telemetry transport: register
//! interest in one [`SignalPath`] and receive its samples asynchronously,
//! one at a time, in arrival order for that path. Ordering across different
//! paths is not guaranteed. Delivery reliability, reconnection, and the
//! shape of the underlying transport are the collaborator's concern.
//!
//! [`ChannelStream`] is the in-process implementation used by demos and
//! tests: a bounded `mpsc` queue per registration, fed by [`ChannelStream::feed`].
//!
//! ## Diagram
//! ```text
//!    feed(sample)
//!        │              (fan-out per registered listener on the path)
//!        ├────────────► [queue A] ─► listener A
//!        └────────────► [queue B] ─► listener B
//! ```
//!
//! ## Rules
//! - `feed` never blocks; a full or closed queue drops the sample for that
//!   listener only (warn), other listeners are unaffected.
//! - Per-path FIFO follows from the per-registration `mpsc` queue.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::error::RuntimeError;

use super::sample::{SignalPath, SignalSample};

/// Contract with the telemetry transport.
///
/// The monitor registers one listener per signal path of interest during
/// start-up and consumes the returned queue until shutdown.
#[async_trait]
pub trait SignalStream: Send + Sync + 'static {
    /// Registers interest in one signal path.
    ///
    /// Samples for `path` arrive on the returned queue asynchronously, one
    /// at a time, in arrival order.
    async fn subscribe(
        &self,
        path: SignalPath,
    ) -> Result<mpsc::Receiver<SignalSample>, RuntimeError>;
}

/// In-process signal stream backed by bounded channels.
///
/// Stands in for the real telemetry transport in demos and tests. The
/// producer side is [`ChannelStream::feed`]; each [`SignalStream::subscribe`]
/// call gets its own queue.
pub struct ChannelStream {
    queue_capacity: usize,
    taps: RwLock<HashMap<SignalPath, Vec<mpsc::Sender<SignalSample>>>>,
}

impl ChannelStream {
    /// Creates a new stream whose per-listener queues hold `queue_capacity`
    /// samples (clamped to a minimum of 1).
    pub fn new(queue_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            queue_capacity: queue_capacity.max(1),
            taps: RwLock::new(HashMap::new()),
        })
    }

    /// Delivers one sample to every listener registered for its path.
    ///
    /// Non-blocking. A listener whose queue is full or whose receiver was
    /// dropped loses this sample (warn); delivery to the others proceeds.
    pub async fn feed(&self, sample: SignalSample) {
        let taps = self.taps.read().await;
        let Some(senders) = taps.get(&sample.path()) else {
            return;
        };
        for tx in senders {
            match tx.try_send(sample) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    eprintln!(
                        "[crashvisor] stream '{}' dropped sample: queue full",
                        sample.path()
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    eprintln!(
                        "[crashvisor] stream '{}' dropped sample: listener closed",
                        sample.path()
                    );
                }
            }
        }
    }

    /// Number of listeners currently registered for `path`.
    pub async fn listener_count(&self, path: SignalPath) -> usize {
        self.taps
            .read()
            .await
            .get(&path)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl SignalStream for ChannelStream {
    async fn subscribe(
        &self,
        path: SignalPath,
    ) -> Result<mpsc::Receiver<SignalSample>, RuntimeError> {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.taps.write().await.entry(path).or_default().push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_in_arrival_order_per_path() {
        let stream = ChannelStream::new(8);
        let mut rx = stream
            .subscribe(SignalPath::LongitudinalAcceleration)
            .await
            .unwrap();

        for a in [1.0, 2.0, 3.0] {
            stream.feed(SignalSample::LongitudinalAcceleration(a)).await;
        }

        for expected in [1.0, 2.0, 3.0] {
            match rx.recv().await {
                Some(SignalSample::LongitudinalAcceleration(a)) => assert_eq!(a, expected),
                other => panic!("unexpected delivery: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_paths_are_isolated() {
        let stream = ChannelStream::new(8);
        let mut warn_rx = stream.subscribe(SignalPath::ObstacleWarning).await.unwrap();

        stream
            .feed(SignalSample::LongitudinalAcceleration(99.0))
            .await;
        stream.feed(SignalSample::ObstacleWarning(true)).await;

        assert_eq!(warn_rx.recv().await, Some(SignalSample::ObstacleWarning(true)));
    }

    #[tokio::test]
    async fn test_feed_without_listeners_is_a_noop() {
        let stream = ChannelStream::new(8);
        stream.feed(SignalSample::ObstacleWarning(true)).await;
        assert_eq!(stream.listener_count(SignalPath::ObstacleWarning).await, 0);
    }
}
