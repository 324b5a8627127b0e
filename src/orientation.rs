//! Device orientation handling and screen-frame angle correction.
//!
//! The raw rotation angle `atan2(gravity_x, gravity_y)` is expressed in the
//! device's sensor frame. Depending on how the device is physically held,
//! the screen frame is offset from the sensor frame by a fixed amount; this
//! module re-maps the raw angle accordingly.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Coarse physical orientation of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOrientation {
    /// Upright, home indicator at the bottom
    Portrait,
    /// Upright, home indicator at the top
    PortraitUpsideDown,
    /// Rotated left
    LandscapeLeft,
    /// Rotated right
    LandscapeRight,
    /// Face up, face down, or unknown
    Other,
}

impl Default for DeviceOrientation {
    fn default() -> Self {
        Self::Portrait
    }
}

/// Map a sensor-frame rotation angle into the screen frame.
///
/// The raw angle must come from `atan2(gravity_x, gravity_y)` with x as the
/// first argument, which ties "up" in gravity space to zero rotation in
/// portrait-like orientations. The result is not normalized into any
/// canonical range; trigonometric rotation transforms are periodic, so
/// callers that need a canonical angle should pass the result through
/// [`normalize_angle`].
#[must_use]
pub fn corrected_rotation(raw_angle: f64, orientation: DeviceOrientation) -> f64 {
    match orientation {
        DeviceOrientation::Portrait => raw_angle - PI,
        DeviceOrientation::PortraitUpsideDown => raw_angle,
        DeviceOrientation::LandscapeLeft => raw_angle + FRAC_PI_2,
        DeviceOrientation::LandscapeRight => raw_angle - FRAC_PI_2,
        DeviceOrientation::Other => raw_angle,
    }
}

/// Wrap an angle into the canonical range (-π, π]
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }

    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

/// Provides the current device orientation on demand (polled, not pushed)
pub trait OrientationProvider {
    /// Current physical orientation of the device
    fn orientation(&self) -> DeviceOrientation;
}

/// Orientation provider that always reports the same orientation.
///
/// Used by the demo and by hosts whose orientation is locked.
#[derive(Debug, Clone, Copy)]
pub struct FixedOrientation(pub DeviceOrientation);

impl OrientationProvider for FixedOrientation {
    fn orientation(&self) -> DeviceOrientation {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_table() {
        let raw = 0.0_f64.atan2(1.0);

        let cases = [
            (DeviceOrientation::Portrait, raw - PI),
            (DeviceOrientation::PortraitUpsideDown, raw),
            (DeviceOrientation::LandscapeLeft, raw + FRAC_PI_2),
            (DeviceOrientation::LandscapeRight, raw - FRAC_PI_2),
            (DeviceOrientation::Other, raw),
        ];

        for (orientation, expected) in cases {
            assert_eq!(
                corrected_rotation(raw, orientation),
                expected,
                "wrong offset for {orientation:?}"
            );
        }
    }

    #[test]
    fn test_other_is_identity() {
        for &raw in &[-4.0, -0.5, 0.0, 1.2, 7.9] {
            assert_eq!(corrected_rotation(raw, DeviceOrientation::Other), raw);
        }
    }

    #[test]
    fn test_result_not_normalized() {
        // Portrait correction of a small negative raw angle leaves the
        // caller with a value below -π; that is intentional.
        let corrected = corrected_rotation(-0.1, DeviceOrientation::Portrait);
        assert!(corrected < -PI);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-12);
        assert!(normalize_angle(f64::NAN).is_nan());
    }

    #[test]
    fn test_fixed_orientation_provider() {
        let provider = FixedOrientation(DeviceOrientation::LandscapeLeft);
        assert_eq!(provider.orientation(), DeviceOrientation::LandscapeLeft);
    }
}
