//! # Crash decision engine.
//!
//! Pure rules mapping a [`SignalSample`](crate::SignalSample) to a binary
//! crash verdict. No state, no side effects; the protocol layer decides
//! what to do with a verdict.

mod trigger;

pub use trigger::{is_crash_trigger, ACCEL_LIMIT};
