//! # Global runtime configuration.
//!
//! Provides [`Config`], centralized settings for the monitor runtime.
//!
//! These knobs size the glue only. The decision core itself has no
//! configuration surface: the acceleration bound and the topic names are
//! constants ([`ACCEL_LIMIT`](crate::ACCEL_LIMIT),
//! [`CRASH_EVENT_TOPIC`](crate::CRASH_EVENT_TOPIC),
//! [`CRASH_ACK_TOPIC`](crate::CRASH_ACK_TOPIC)).

use std::time::Duration;

/// Global configuration for the monitor runtime.
///
/// ## Field semantics
/// - `grace`: maximum wait for listeners to stop at shutdown
/// - `bus_capacity`: internal event bus ring buffer size (min 1; clamped)
/// - `queue_capacity`: per-listener signal queue size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for graceful shutdown before force-terminating.
    ///
    /// When a termination signal is received:
    /// - Listeners are cancelled via `CancellationToken`
    /// - The monitor waits up to `grace` for them to exit
    /// - If the wait times out, `run` returns `RuntimeError::GraceExceeded`
    pub grace: Duration,

    /// Capacity of the internal event bus broadcast ring buffer.
    ///
    /// Subscribers that lag behind more than `bus_capacity` events receive
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Capacity of each listener's inbound signal queue.
    ///
    /// A full queue drops the newest sample for that listener (warn from
    /// the stream side).
    pub queue_capacity: usize,
}

impl Config {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the per-listener queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 5s` (telemetry listeners hold no state worth a long drain)
    /// - `bus_capacity = 1024`
    /// - `queue_capacity = 64`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
            queue_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacities_are_clamped_to_one() {
        let cfg = Config {
            bus_capacity: 0,
            queue_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.queue_capacity_clamped(), 1);
    }
}
