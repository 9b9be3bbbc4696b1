//! # Telemetry data model.
//!
//! [`SignalPath`] names the vehicle quantities the monitor subscribes to,
//! and [`SignalSample`] is one typed delivery on such a path. Samples are
//! immutable and carry exactly one value each; the stream never batches.
//!
//! Path strings follow the vehicle signal tree of the telemetry source.
//! Versioning and modeling of that tree is the source's concern, not ours.

use std::fmt;

/// Named telemetry quantity the monitor can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalPath {
    /// Obstacle-warning flag. Trusted as already debounced by its source.
    ObstacleWarning,
    /// Longitudinal acceleration, in the unit supplied by the source.
    LongitudinalAcceleration,
}

impl SignalPath {
    /// Every path the monitor listens to.
    pub const ALL: [SignalPath; 2] = [
        SignalPath::ObstacleWarning,
        SignalPath::LongitudinalAcceleration,
    ];

    /// Full dotted name of the signal in the vehicle signal tree.
    ///
    /// # Example
    /// ```
    /// use crashvisor::SignalPath;
    ///
    /// assert_eq!(
    ///     SignalPath::LongitudinalAcceleration.as_str(),
    ///     "Vehicle.Acceleration.Longitudinal",
    /// );
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalPath::ObstacleWarning => "Vehicle.ADAS.ObstacleDetection.IsWarning",
            SignalPath::LongitudinalAcceleration => "Vehicle.Acceleration.Longitudinal",
        }
    }
}

impl fmt::Display for SignalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed telemetry sample.
///
/// Tagged by the path it arrived on; the transport's typed contract means a
/// malformed sample cannot be represented here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalSample {
    /// Current state of the obstacle-warning flag.
    ObstacleWarning(bool),
    /// Longitudinal acceleration value, un-normalized source units.
    LongitudinalAcceleration(f64),
}

impl SignalSample {
    /// Path this sample was delivered on.
    pub fn path(&self) -> SignalPath {
        match self {
            SignalSample::ObstacleWarning(_) => SignalPath::ObstacleWarning,
            SignalSample::LongitudinalAcceleration(_) => SignalPath::LongitudinalAcceleration,
        }
    }

    /// Numeric rendering of the value, for event metadata and logs.
    ///
    /// The warning flag renders as `1.0` / `0.0`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            SignalSample::ObstacleWarning(raised) => {
                if raised {
                    1.0
                } else {
                    0.0
                }
            }
            SignalSample::LongitudinalAcceleration(a) => a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reports_its_path() {
        assert_eq!(
            SignalSample::ObstacleWarning(true).path(),
            SignalPath::ObstacleWarning
        );
        assert_eq!(
            SignalSample::LongitudinalAcceleration(-3.5).path(),
            SignalPath::LongitudinalAcceleration
        );
    }

    #[test]
    fn test_flag_renders_as_zero_or_one() {
        assert_eq!(SignalSample::ObstacleWarning(true).as_f64(), 1.0);
        assert_eq!(SignalSample::ObstacleWarning(false).as_f64(), 0.0);
    }
}
