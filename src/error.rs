//! Error types used by the crashvisor runtime.
//!
//! The decision logic itself is infallible: the predicate is pure, samples
//! are typed, and publishing is fire-and-forget by contract. The only
//! errors the crate surfaces come from the runtime glue - registering with
//! the collaborators at start-up and draining listeners at shutdown.
//!
//! [`RuntimeError`] provides helper methods (`as_label`, `as_message`) for
//! logs, matching how events are labeled elsewhere.
//!
//! Deliberately **not** errors:
//! - a publish that goes nowhere (fire-and-forget, never surfaced);
//! - an acknowledgment that never arrives (the verdict simply stays
//!   `Detected`);
//! - a malformed sample (unrepresentable under the typed stream contract).

use std::time::Duration;

use thiserror::Error;

/// # Errors produced by the monitor runtime.
///
/// These represent failures of the glue around the decision core, not of
/// the decision logic.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Registering with a collaborator (signal stream or topic bus) failed
    /// during start-up.
    #[error("subscribing to {stream} failed: {reason}")]
    SubscribeFailed {
        /// The signal path or topic that could not be subscribed.
        stream: String,
        /// Collaborator-provided failure detail.
        reason: String,
    },

    /// Shutdown grace period was exceeded; some listeners remained stuck
    /// and had to be force-terminated.
    #[error("shutdown grace {grace:?} exceeded; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use crashvisor::RuntimeError;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::SubscribeFailed { .. } => "runtime_subscribe_failed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::SubscribeFailed { stream, reason } => {
                format!("subscribe failed: stream={stream} reason={reason}")
            }
            RuntimeError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}")
            }
        }
    }
}
