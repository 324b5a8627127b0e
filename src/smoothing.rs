//! Exponential low-pass smoothing for scalar sensor streams.
//!
//! Accelerometer samples are jittery; each axis runs through its own
//! `LowPassSignal` before the rotation angle is computed. The gyroscope-fused
//! gravity path skips smoothing entirely.

/// Exponential low-pass filter state for one scalar stream.
///
/// `update` returns a new state rather than mutating in place; the caller
/// reassigns it. The factor weights history: a factor of 0.85 keeps 85% of
/// the previous value and mixes in 15% of each new sample.
///
/// Non-finite samples are not guarded here and will propagate NaN through
/// the state; the pipeline drops malformed samples before they reach the
/// filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassSignal {
    value: f64,
    factor: f64,
}

impl LowPassSignal {
    /// Create a new filter state with the given initial value and factor
    ///
    /// # Panics
    ///
    /// Panics if factor is not in the range [0, 1)
    #[must_use]
    pub fn new(initial_value: f64, factor: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&factor),
            "Filter factor must be in [0, 1)"
        );
        Self {
            value: initial_value,
            factor,
        }
    }

    /// Fold a new sample into the state, returning the updated state.
    ///
    /// The result is a convex combination of the previous value and the
    /// sample, so for finite inputs it always lies between the two.
    #[must_use]
    pub fn update(self, sample: f64) -> Self {
        Self {
            value: self.factor.mul_add(self.value, (1.0 - self.factor) * sample),
            factor: self.factor,
        }
    }

    /// Current filtered value
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Smoothing factor (immutable for the lifetime of the state)
    #[must_use]
    pub const fn factor(&self) -> f64 {
        self.factor
    }
}
