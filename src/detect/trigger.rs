//! # Crash trigger predicate.
//!
//! One rule per signal path:
//! - **Obstacle warning**: the raised flag is the verdict. The source
//!   debounces the flag; no hysteresis is applied here.
//! - **Longitudinal acceleration**: trigger iff the value lies strictly
//!   outside `[-ACCEL_LIMIT, ACCEL_LIMIT]`. The bound is symmetric: hard
//!   braking and hard acceleration or impact are treated identically.
//!
//! ## Example
//! ```
//! use crashvisor::{is_crash_trigger, SignalSample};
//!
//! assert!(is_crash_trigger(&SignalSample::LongitudinalAcceleration(-60.0)));
//! assert!(!is_crash_trigger(&SignalSample::LongitudinalAcceleration(50.0)));
//! assert!(is_crash_trigger(&SignalSample::ObstacleWarning(true)));
//! ```

use crate::signals::SignalSample;

/// Symmetric acceleration bound, in the unit supplied by the signal source
/// (un-normalized).
///
/// Values exactly at the bound do not trigger (open interval).
pub const ACCEL_LIMIT: f64 = 50.0;

/// Returns whether the sample is a crash trigger.
///
/// Pure predicate: no state, no side effects. NaN acceleration never
/// triggers (both comparisons are false).
pub fn is_crash_trigger(sample: &SignalSample) -> bool {
    match *sample {
        SignalSample::ObstacleWarning(raised) => raised,
        SignalSample::LongitudinalAcceleration(a) => a < -ACCEL_LIMIT || a > ACCEL_LIMIT,
    }
}
