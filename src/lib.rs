//! # crashvisor
//!
//! **Crashvisor** is a reactive crash-detection core for vehicle telemetry.
//!
//! It watches two signals - an obstacle-warning flag and longitudinal
//! acceleration - turns each sample into a binary crash verdict, and keeps
//! a small acknowledge-to-clear state machine that announces the verdict on
//! a publish/subscribe topic. The transports on both sides are
//! collaborators behind traits; the crate's content is the decision rules
//! and the protocol that governs when the crash event is (re)announced and
//! retracted.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  Vehicle.ADAS.ObstacleDetection.IsWarning    Vehicle.Acceleration.Longitudinal
//!                   │                                     │
//!                   ▼                                     ▼
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  SignalStream (collaborator seam, per-path FIFO delivery)          │
//! └────────┬────────────────────────────────────┬──────────────────────┘
//!          ▼                                    ▼
//!    listener task                        listener task
//!          │                                    │
//!          └──────────────┬─────────────────────┘
//!                         ▼            on_acknowledgment
//!               ┌───────────────────┐◄─────────────────── ack listener
//!               │   CrashProtocol   │                          ▲
//!               │  (guarded status) │                          │
//!               └─────────┬─────────┘          TopicBus.subscribe(
//!                         │                     "crashdetect/crashed/response")
//!                         │ publish {"result":{"status":0|1}}
//!                         ▼
//!               TopicBus ("crashdetect/crashed")
//!
//! Observability (internal, fire-and-forget):
//!   protocol/listeners ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                        │
//!                                                 SubscriberSet ─► LogWriter, ...
//! ```
//!
//! ### Decision rules
//! - Obstacle warning raised → crash trigger (the flag is pre-debounced).
//! - |longitudinal acceleration| strictly above 50 source units → crash
//!   trigger; exactly ±50 does not trigger.
//!
//! ### Protocol
//! - Any trigger publishes `{"result":{"status":1}}` and sets the verdict
//!   to `Detected` - every trigger re-publishes, no deduplication.
//! - Any acknowledgment publishes `{"result":{"status":0}}` and clears the
//!   verdict, unconditionally.
//! - There is no timeout while waiting for an acknowledgment; `Detected`
//!   persists until one arrives.
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                      |
//! |--------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Decision**       | Pure crash predicate over typed samples.                     | [`is_crash_trigger`], [`SignalSample`]  |
//! | **Protocol**       | Guarded verdict, announce/clear publishing.                  | [`CrashProtocol`], [`CrashStatus`]      |
//! | **Seams**          | Traits for the telemetry and pub/sub transports.             | [`SignalStream`], [`TopicBus`]          |
//! | **Runtime**        | Listener wiring, OS signals, graceful shutdown.              | [`Monitor`], [`Config`]                 |
//! | **Subscriber API** | Hook into runtime events (logging, metrics, custom).         | [`Subscribe`], [`Event`], [`EventKind`] |
//! | **Errors**         | Typed errors for the runtime glue.                           | [`RuntimeError`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use crashvisor::{
//!     ChannelStream, Config, MemoryTopicBus, Monitor, SignalSample, Subscribe,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let stream = ChannelStream::new(cfg.queue_capacity_clamped());
//!     let topics = MemoryTopicBus::new(cfg.bus_capacity_clamped());
//!
//!     // Feed a hard-braking sample from elsewhere (normally the transport
//!     // does this).
//!     let feeder = Arc::clone(&stream);
//!     tokio::spawn(async move {
//!         feeder
//!             .feed(SignalSample::LongitudinalAcceleration(-60.0))
//!             .await;
//!     });
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!     let monitor = Monitor::new(cfg, stream, topics, subs);
//!     monitor.run().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod detect;
mod error;
mod events;
mod protocol;
mod signals;
mod subscribers;
mod transport;

// ---- Public re-exports ----

pub use core::{Config, Monitor};
pub use detect::{is_crash_trigger, ACCEL_LIMIT};
pub use error::RuntimeError;
pub use events::{Bus, Event, EventKind};
pub use protocol::{CrashEvent, CrashProtocol, CrashResult, CrashStatus};
pub use signals::{ChannelStream, SignalPath, SignalSample, SignalStream};
pub use subscribers::{Subscribe, SubscriberSet};
pub use transport::{MemoryTopicBus, TopicBus, CRASH_ACK_TOPIC, CRASH_EVENT_TOPIC};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
