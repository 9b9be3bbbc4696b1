//! # Monitor: wires the decision core to its collaborators.
//!
//! The [`Monitor`] owns the internal event bus, a [`SubscriberSet`], the
//! [`CrashProtocol`], and handles to the two external collaborators: the
//! signal stream and the topic bus. It registers the listeners, fans events
//! out to subscribers, handles OS signals, and drains on shutdown.
//!
//! ## Key responsibilities
//! - subscribe one listener per signal path and one for the acknowledgment
//!   topic, all feeding the [`CrashProtocol`]
//! - subscribe to the internal [`Bus`] and **fan-out** events via
//!   [`SubscriberSet`]
//! - handle OS termination signals (SIGINT/SIGTERM/Ctrl-C)
//! - perform graceful shutdown within [`Config::grace`]
//!
//! ## High-level architecture
//! ```text
//! Preparation:
//!   subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! Listeners (one task each, all children of the runtime token):
//!   SignalStream.subscribe(ObstacleWarning)  ──► on_sample ──┐
//!   SignalStream.subscribe(LongitudinalAcc.) ──► on_sample ──┼─► CrashProtocol
//!   TopicBus.subscribe(ack topic)            ──► on_ack    ──┘       │
//!                                                                    ▼
//!                                     TopicBus.publish("crashdetect/crashed")
//!
//! Shutdown path:
//!   shutdown::wait_for_shutdown_signal()
//!             └─► Bus.publish(ShutdownRequested)
//!             └─► runtime_token.cancel()   → propagates to listeners
//!             └─► wait_all_with_grace(cfg.grace):
//!                    ├─ Ok (all joined)    → Bus.publish(AllStoppedWithin)
//!                    └─ Timeout exceeded   → Bus.publish(GraceExceeded)
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use crashvisor::{ChannelStream, Config, MemoryTopicBus, Monitor, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let stream = ChannelStream::new(cfg.queue_capacity_clamped());
//!     let topics = MemoryTopicBus::new(cfg.bus_capacity_clamped());
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!     let monitor = Monitor::new(cfg, stream, topics, subs);
//!     monitor.run().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::core::{config::Config, shutdown};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::protocol::CrashProtocol;
use crate::signals::{SignalPath, SignalSample, SignalStream};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::transport::{TopicBus, CRASH_ACK_TOPIC};

/// Coordinates listeners, event delivery (via [`SubscriberSet`]), and
/// graceful shutdown.
pub struct Monitor {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Internal event bus shared with the protocol and listeners.
    pub events: Bus,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    /// The decision core; sole owner of the crash verdict.
    pub protocol: Arc<CrashProtocol>,
    /// Telemetry transport handle.
    signals: Arc<dyn SignalStream>,
    /// Publish/subscribe bus handle.
    topics: Arc<dyn TopicBus>,
}

impl Monitor {
    /// Creates a new monitor with the given config, collaborator handles,
    /// and subscribers.
    pub fn new(
        cfg: Config,
        signals: Arc<dyn SignalStream>,
        topics: Arc<dyn TopicBus>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let events = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, events.clone()));
        let protocol = Arc::new(CrashProtocol::new(Arc::clone(&topics), events.clone()));

        Self {
            cfg,
            events,
            subs,
            protocol,
            signals,
            topics,
        }
    }

    /// Runs the monitor until either:
    /// - every listener exits on its own (all upstreams closed), or
    /// - a termination signal arrives → graceful shutdown (may end with
    ///   `GraceExceeded`).
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.subscriber_listener();
        self.events.publish(Event::new(EventKind::MonitorStarted));

        let token = CancellationToken::new();
        let mut set = JoinSet::new();
        // Ack first: the verdict must be clearable from the moment the
        // first trigger can fire.
        self.spawn_ack_listener(&mut set, &token).await?;
        self.spawn_signal_listeners(&mut set, &token).await?;
        self.drive_shutdown(&mut set, &token).await
    }

    /// Subscribes to the internal bus and forwards events to the
    /// subscriber set (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.events.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Registers one listener task per signal path of interest.
    async fn spawn_signal_listeners(
        &self,
        set: &mut JoinSet<()>,
        runtime_token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        for path in SignalPath::ALL {
            let rx = self.signals.subscribe(path).await?;
            set.spawn(Self::signal_listener(
                rx,
                Arc::clone(&self.protocol),
                self.events.clone(),
                runtime_token.child_token(),
                path,
            ));
        }
        Ok(())
    }

    /// Consumes one signal path's queue until cancellation or upstream
    /// close. Samples are handed to the protocol one at a time, preserving
    /// per-path arrival order.
    async fn signal_listener(
        mut rx: mpsc::Receiver<SignalSample>,
        protocol: Arc<CrashProtocol>,
        events: Bus,
        token: CancellationToken,
        path: SignalPath,
    ) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                sample = rx.recv() => match sample {
                    Some(sample) => protocol.on_sample(&sample).await,
                    None => {
                        events.publish(Event::new(EventKind::StreamClosed).with_path(path.as_str()));
                        break;
                    }
                }
            }
        }
    }

    /// Registers the acknowledgment listener task.
    ///
    /// Payload content is ignored; each arrival clears the verdict.
    async fn spawn_ack_listener(
        &self,
        set: &mut JoinSet<()>,
        runtime_token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        let mut rx = self.topics.subscribe(CRASH_ACK_TOPIC).await?;
        let protocol = Arc::clone(&self.protocol);
        let events = self.events.clone();
        let token = runtime_token.child_token();

        set.spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    payload = rx.recv() => match payload {
                        Some(_payload) => protocol.on_acknowledgment().await,
                        None => {
                            events.publish(
                                Event::new(EventKind::StreamClosed).with_path(CRASH_ACK_TOPIC),
                            );
                            break;
                        }
                    }
                }
            }
        });
        Ok(())
    }

    /// Waits until either all listeners finish or a shutdown signal is
    /// received.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<()>,
        runtime_token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {
                self.events.publish(Event::new(EventKind::ShutdownRequested));
                runtime_token.cancel();
                self.wait_all_with_grace(set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Waits for all listeners to finish within the configured grace
    /// period.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`].
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };
        let timed = tokio::time::timeout(grace, done).await;

        match timed {
            Ok(_) => {
                self.events.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.events.publish(Event::new(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded { grace })
            }
        }
    }
}
