//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to
//! multiple subscribers **without awaiting** their processing, and reports
//! its own plumbing failures back onto the [`Bus`](crate::events::Bus) as
//! [`SubscriberOverflow`](crate::EventKind::SubscriberOverflow) and
//! [`SubscriberPanicked`](crate::EventKind::SubscriberPanicked) events.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported on the bus
//!   (isolation).
//! - A full or closed subscriber queue drops the event for that subscriber
//!   only and reports the drop on the bus.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow.
//!
//! ## Feedback guard
//! Overflow and panic reports are events themselves and fan out like any
//! other. When the event being dropped (or panicked on) is already a
//! plumbing event, the report downgrades to stderr: re-publishing it would
//! chase the same full queue in a loop.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//!                  │                            │
//!                  │ queue full/closed          │ panic caught
//!                  ▼                            ▼
//!        Bus.publish(SubscriberOverflow)   Bus.publish(SubscriberPanicked)
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
///
/// Holds a [`Bus`] handle of its own so queue overflow and subscriber
/// panics surface as observable events rather than disappearing into
/// stderr.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    events: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// `events` is where plumbing failures (overflow, panics) are
    /// reported; it is the same bus whose events this set fans out.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, events: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (sender, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            workers.push(Self::spawn_worker(sub, rx, events.clone()));
            channels.push(SubscriberChannel { name, sender });
        }

        Self {
            channels,
            workers,
            events,
        }
    }

    /// Worker loop for one subscriber: drain the queue, isolate panics.
    fn spawn_worker(
        sub: Arc<dyn Subscribe>,
        mut rx: mpsc::Receiver<Arc<Event>>,
        events: Bus,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let fut = sub.on_event(ev.as_ref());
                let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                else {
                    continue;
                };

                if ev.is_subscriber_overflow() || ev.is_subscriber_panic() {
                    // Panicked on a plumbing event; reporting it as another
                    // event could loop. Last resort: stderr.
                    eprintln!(
                        "[crashvisor] subscriber '{}' panicked on a plumbing event: {:?}",
                        sub.name(),
                        panic_err
                    );
                } else {
                    events.publish(Event::subscriber_panicked(
                        sub.name(),
                        format!("{panic_err:?}"),
                    ));
                }
            }
        })
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is
    /// dropped for it and a [`SubscriberOverflow`](crate::EventKind::SubscriberOverflow)
    /// event naming the subscriber is published.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.report_drop(event, channel.name, "queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.report_drop(event, channel.name, "worker closed");
                }
            }
        }
    }

    /// Reports one dropped event for one subscriber.
    ///
    /// A dropped plumbing event downgrades to stderr: re-publishing it
    /// would chase the same full queue.
    fn report_drop(&self, event: &Event, subscriber: &'static str, reason: &'static str) {
        if event.is_subscriber_overflow() || event.is_subscriber_panic() {
            eprintln!("[crashvisor] subscriber '{subscriber}' dropped event: {reason}");
        } else {
            self.events
                .publish(Event::subscriber_overflow(subscriber, reason));
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::events::EventKind;

    use super::*;

    struct Counting {
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Subscribe for Counting {
        async fn on_event(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let subs: Vec<Arc<dyn Subscribe>> = vec![
            Arc::new(Counting { seen: a.clone() }),
            Arc::new(Counting { seen: b.clone() }),
        ];
        let set = SubscriberSet::new(subs, Bus::new(8));

        set.emit(&Event::new(EventKind::AckReceived));
        set.emit(&Event::new(EventKind::AckReceived));
        set.shutdown().await;

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    struct Panicking;

    #[async_trait]
    impl Subscribe for Panicking {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_poison_the_set() {
        let seen = Arc::new(AtomicUsize::new(0));
        let subs: Vec<Arc<dyn Subscribe>> = vec![
            Arc::new(Panicking),
            Arc::new(Counting { seen: seen.clone() }),
        ];
        let set = SubscriberSet::new(subs, Bus::new(8));

        set.emit(&Event::new(EventKind::AckReceived));
        set.shutdown().await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_the_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Panicking)];
        let set = SubscriberSet::new(subs, bus);

        set.emit(&Event::new(EventKind::AckReceived));
        set.shutdown().await;

        let report = rx.recv().await.unwrap();
        assert_eq!(report.kind, EventKind::SubscriberPanicked);
        assert_eq!(report.path.as_deref(), Some("panicking"));
    }

    /// Parks forever so its queue can never drain.
    struct Stuck;

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _event: &Event) {
            futures::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_overflow_is_reported_on_the_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Stuck)];
        let set = SubscriberSet::new(subs, bus);

        // Capacity 1 and a worker that never drains: with three emits at
        // least one try_send must hit a full queue.
        for _ in 0..3 {
            set.emit(&Event::new(EventKind::AckReceived));
        }

        let report = rx.recv().await.unwrap();
        assert_eq!(report.kind, EventKind::SubscriberOverflow);
        assert_eq!(report.path.as_deref(), Some("stuck"));
        assert_eq!(report.reason.as_deref(), Some("queue full"));
    }
}
