//! Constants used throughout the application

/// Default motion sampling interval in seconds (100 Hz)
pub const DEFAULT_SAMPLING_INTERVAL_SECS: f64 = 0.01;

/// Default smoothing factor for the accelerometer low-pass filters
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.85;

/// Default display refresh rate in Hz for decoupled consumption
pub const DEFAULT_DISPLAY_REFRESH_HZ: f64 = 60.0;

/// Smoothing factor bounds
pub const SMOOTHING_FACTOR_MIN: f64 = 0.0;
pub const SMOOTHING_FACTOR_MAX: f64 = 1.0;

/// Default simulated tilt rate in radians per second
pub const DEFAULT_TILT_RATE: f64 = 0.5;

/// Default simulated accelerometer noise amplitude (fraction of 1 g)
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.15;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
