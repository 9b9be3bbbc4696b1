//! # Telemetry signals: data model and stream seam.
//!
//! This module provides the signal-side types:
//! - [`SignalPath`] - named telemetry quantities the monitor listens to
//! - [`SignalSample`] - one typed, immutable delivery
//! - [`SignalStream`] - trait for the transport that delivers samples
//! - [`ChannelStream`] - in-process stream implementation for demos/tests

mod sample;
mod stream;

pub use sample::{SignalPath, SignalSample};
pub use stream::{ChannelStream, SignalStream};
