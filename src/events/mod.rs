//! # Internal observability events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the monitor, the crash
//! protocol, the listener tasks, and the subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] - event classification and metadata
//! - [`Bus`] - thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Monitor`, `CrashProtocol`, listener tasks,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: `Monitor::subscriber_listener()`, which fans events out
//!   to the `SubscriberSet`.
//!
//! These events are observability only; the crash verdict itself travels
//! on the external topic bus (see [`crate::transport`]).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
