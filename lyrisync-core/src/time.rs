//! Time conversion utilities.
//!
//! Playback times are plain `f64` seconds. This module keeps the lossy
//! float-to-integer conversions in one place, with explicit saturation and
//! clamping behavior.

/// Extension trait for second-based `f64` time values.
pub trait SecondsExt {
    /// Whether the value can be rendered as a timestamp (finite and not negative).
    fn is_valid_time(self) -> bool;

    /// Add `delta` seconds, clamping the result at a floor of zero.
    fn shifted_clamped(self, delta: f64) -> Self;

    /// Split into whole minutes, whole seconds within the minute and truncated
    /// hundredths of a second.
    ///
    /// Returns `None` for negative or non-finite values.
    fn to_clock_parts(self) -> Option<ClockParts>;
}

/// A time split into the fields of an LRC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockParts {
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

impl SecondsExt for f64 {
    fn is_valid_time(self) -> bool {
        self.is_finite() && self >= 0.0
    }

    fn shifted_clamped(self, delta: f64) -> Self {
        (self + delta).max(0.0)
    }

    fn to_clock_parts(self) -> Option<ClockParts> {
        if !self.is_valid_time() {
            return None;
        }

        // Truncate once on the whole value; the epsilon absorbs binary
        // representation error (1.14 * 100.0 == 113.99999999999999)
        let total = floor_to_u64(self.mul_add(100.0, HUNDREDTHS_EPSILON));

        Some(ClockParts {
            minutes: total / 6000,
            seconds: (total / 100) % 60,
            hundredths: total % 100,
        })
    }
}

/// Tolerance added before truncating to hundredths
const HUNDREDTHS_EPSILON: f64 = 1e-6;

/// Floor a non-negative finite value into a `u64`, saturating at `u64::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_u64(value: f64) -> u64 {
    // `as` saturates for out-of-range floats
    value.floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_parts() {
        let parts = 65.256_f64.to_clock_parts().unwrap();
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 5);
        assert_eq!(parts.hundredths, 25);
    }

    #[test]
    fn test_clock_parts_zero() {
        let parts = 0.0_f64.to_clock_parts().unwrap();
        assert_eq!(
            parts,
            ClockParts {
                minutes: 0,
                seconds: 0,
                hundredths: 0
            }
        );
    }

    #[test]
    fn test_clock_parts_long_track() {
        // 2h 3m 4.5s
        let parts = 7384.5_f64.to_clock_parts().unwrap();
        assert_eq!(parts.minutes, 123);
        assert_eq!(parts.seconds, 4);
        assert_eq!(parts.hundredths, 50);
    }

    #[test]
    fn test_clock_parts_two_decimal_times() {
        for cents in 0..20_000_u32 {
            let parts = (f64::from(cents) / 100.0).to_clock_parts().unwrap();
            let total = parts.minutes * 6000 + parts.seconds * 100 + parts.hundredths;
            assert_eq!(total, u64::from(cents), "time {cents} hundredths");
        }
    }

    #[test]
    fn test_clock_parts_invalid() {
        assert!((-1.0_f64).to_clock_parts().is_none());
        assert!(f64::NAN.to_clock_parts().is_none());
        assert!(f64::INFINITY.to_clock_parts().is_none());
    }

    #[test]
    fn test_shifted_clamped() {
        assert!((1.0_f64.shifted_clamped(0.5) - 1.5).abs() < f64::EPSILON);
        assert_eq!(1.0_f64.shifted_clamped(-5.0), 0.0);
        // Negative input (e.g. from a drag) comes back up to zero
        assert_eq!((-0.5_f64).shifted_clamped(0.1), 0.0);
    }

    #[test]
    fn test_floor_saturates() {
        assert_eq!(floor_to_u64(1e300), u64::MAX);
    }
}
