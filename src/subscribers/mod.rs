//! # Event subscribers for the monitor runtime.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! for handling runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   CrashProtocol ── publish(Event) ──► Bus ──► subscriber_listener
//!                                       ▲              │
//!                                       │      SubscriberSet::emit(&Event)
//!                    overflow / panic   │         ┌────┴────┬─────────┐
//!                    reports            │         ▼         ▼         ▼
//!                                       └───── LogWriter  Metrics   Custom
//! ```
//!
//! Queue overflow and subscriber panics are reported back onto the bus as
//! [`EventKind::SubscriberOverflow`](crate::EventKind::SubscriberOverflow)
//! / [`EventKind::SubscriberPanicked`](crate::EventKind::SubscriberPanicked)
//! events, so they reach the healthy subscribers like any other event.
//!
//! ## Implementing custom subscribers
//! ```rust
//! use crashvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct CrashCounter;
//!
//! #[async_trait]
//! impl Subscribe for CrashCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::CrashAnnounced {
//!             // increment a counter, raise an alert, ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "crash-counter" }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
