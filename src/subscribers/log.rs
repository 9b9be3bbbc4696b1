//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [starting] crash monitor
//! [sample] path=Vehicle.Acceleration.Longitudinal value=-60
//! [trigger] path=Vehicle.Acceleration.Longitudinal value=-60
//! [crash] status=1
//! [ack]
//! [clear] status=0
//! [stream-closed] path=Vehicle.Acceleration.Longitudinal
//! [shutdown-requested]
//! [all-stopped-within-grace]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::MonitorStarted => {
                println!("[starting] crash monitor");
            }
            EventKind::SampleObserved => {
                println!(
                    "[sample] path={} value={}",
                    e.path.as_deref().unwrap_or("<unknown>"),
                    e.value.unwrap_or(f64::NAN)
                );
            }
            EventKind::TriggerFired => {
                println!(
                    "[trigger] path={} value={}",
                    e.path.as_deref().unwrap_or("<unknown>"),
                    e.value.unwrap_or(f64::NAN)
                );
            }
            EventKind::CrashAnnounced => {
                println!("[crash] status={}", e.status.unwrap_or(1));
            }
            EventKind::CrashCleared => {
                println!("[clear] status={}", e.status.unwrap_or(0));
            }
            EventKind::AckReceived => {
                println!("[ack]");
            }
            EventKind::StreamClosed => {
                println!(
                    "[stream-closed] path={}",
                    e.path.as_deref().unwrap_or("<unknown>")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] name={} reason={}",
                    e.path.as_deref().unwrap_or("<unknown>"),
                    e.reason.as_deref().unwrap_or("<none>")
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] name={} reason={}",
                    e.path.as_deref().unwrap_or("<unknown>"),
                    e.reason.as_deref().unwrap_or("<none>")
                );
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
