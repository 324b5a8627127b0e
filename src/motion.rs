//! Motion source abstraction and sample types.
//!
//! The pipeline never touches sensor hardware directly; it talks to a
//! [`MotionSource`], which reports its capabilities and delivers samples
//! through a callback at a requested interval. Two in-crate implementations
//! exist: [`ScriptedMotionSource`] for hosts (and tests) that pump samples
//! by hand, and [`SimulatedMotionSource`] which synthesizes a tilting device
//! on a simulated clock.

use crate::error::{Error, Result};
use rand::{rngs::ThreadRng, thread_rng, Rng};
use std::time::Duration;

/// A single gravity or acceleration sample in the device frame.
///
/// Transient: consumed by one filter update, never retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityVector {
    /// Device-frame x component
    pub x: f64,
    /// Device-frame y component
    pub y: f64,
}

impl GravityVector {
    /// Create a new sample
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if both components are finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Sensor-frame rotation angle, `atan2(x, y)`.
    ///
    /// x is deliberately the first argument so that gravity pointing along
    /// +y reads as zero rotation.
    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        self.x.atan2(self.y)
    }
}

/// Callback invoked by a motion source for each delivered sample
pub type SampleCallback = Box<dyn FnMut(GravityVector) + Send>;

/// Capability-queryable provider of motion samples.
///
/// Capabilities are probed once at pipeline start; exactly one of the two
/// subscriptions is active at a time. `unsubscribe` releases whichever
/// subscription is active and must be a no-op when none is.
pub trait MotionSource {
    /// True if gyroscope-fused gravity samples are available
    fn has_orientation_sensing(&self) -> bool;

    /// True if raw accelerometer samples are available
    fn has_accelerometer(&self) -> bool;

    /// Subscribe to low-noise gravity samples at the given interval
    fn subscribe_orientation(&mut self, interval: Duration, callback: SampleCallback) -> Result<()>;

    /// Subscribe to raw (jittery) accelerometer samples at the given interval
    fn subscribe_accelerometer(&mut self, interval: Duration, callback: SampleCallback)
        -> Result<()>;

    /// Release the active subscription, if any
    fn unsubscribe(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SensorKind {
    Orientation,
    Accelerometer,
}

/// Motion source pumped by the host: samples are delivered only when
/// [`emit`](ScriptedMotionSource::emit) is called.
///
/// Useful for replaying recorded traces and for tests that need exact
/// control over the sample stream.
pub struct ScriptedMotionSource {
    orientation_sensing: bool,
    accelerometer: bool,
    subscription: Option<(SensorKind, SampleCallback)>,
}

impl ScriptedMotionSource {
    /// Create a source with the given capability flags
    #[must_use]
    pub fn new(orientation_sensing: bool, accelerometer: bool) -> Self {
        Self {
            orientation_sensing,
            accelerometer,
            subscription: None,
        }
    }

    /// Deliver one sample to the subscriber.
    ///
    /// Returns false if nothing is subscribed.
    pub fn emit(&mut self, sample: GravityVector) -> bool {
        match &mut self.subscription {
            Some((_, callback)) => {
                callback(sample);
                true
            }
            None => false,
        }
    }

    /// True if a subscription is active
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn subscribe(
        &mut self,
        kind: SensorKind,
        available: bool,
        callback: SampleCallback,
    ) -> Result<()> {
        if !available {
            return Err(Error::SubscriptionError(format!(
                "{kind:?} sensing not available"
            )));
        }
        if self.subscription.is_some() {
            return Err(Error::SubscriptionError(
                "already subscribed".to_string(),
            ));
        }
        self.subscription = Some((kind, callback));
        Ok(())
    }
}

impl MotionSource for ScriptedMotionSource {
    fn has_orientation_sensing(&self) -> bool {
        self.orientation_sensing
    }

    fn has_accelerometer(&self) -> bool {
        self.accelerometer
    }

    fn subscribe_orientation(&mut self, _interval: Duration, callback: SampleCallback) -> Result<()> {
        self.subscribe(SensorKind::Orientation, self.orientation_sensing, callback)
    }

    fn subscribe_accelerometer(
        &mut self,
        _interval: Duration,
        callback: SampleCallback,
    ) -> Result<()> {
        self.subscribe(SensorKind::Accelerometer, self.accelerometer, callback)
    }

    fn unsubscribe(&mut self) {
        self.subscription = None;
    }
}

/// Clock-driven synthetic motion source.
///
/// Simulates a device tilting at a constant angular rate while held
/// upright: at tilt angle θ the gravity vector in the device frame is
/// `(sin θ, -cos θ)`. The orientation-sensing path delivers that vector
/// as-is; the accelerometer path adds uniform noise to each axis, standing
/// in for raw accelerometer jitter.
pub struct SimulatedMotionSource {
    orientation_sensing: bool,
    accelerometer: bool,
    tilt_rate: f64,
    noise_amplitude: f64,
    subscription: Option<(SensorKind, Duration, SampleCallback)>,
    elapsed: Duration,
    pending: Duration,
    rng: ThreadRng,
}

impl SimulatedMotionSource {
    /// Create a source with the given capability flags and default motion
    #[must_use]
    pub fn new(orientation_sensing: bool, accelerometer: bool) -> Self {
        Self {
            orientation_sensing,
            accelerometer,
            tilt_rate: crate::constants::DEFAULT_TILT_RATE,
            noise_amplitude: crate::constants::DEFAULT_NOISE_AMPLITUDE,
            subscription: None,
            elapsed: Duration::ZERO,
            pending: Duration::ZERO,
            rng: thread_rng(),
        }
    }

    /// Set the simulated tilt rate in radians per second
    #[must_use]
    pub fn with_tilt_rate(mut self, tilt_rate: f64) -> Self {
        self.tilt_rate = tilt_rate;
        self
    }

    /// Set the accelerometer noise amplitude
    #[must_use]
    pub fn with_noise_amplitude(mut self, noise_amplitude: f64) -> Self {
        self.noise_amplitude = noise_amplitude;
        self
    }

    /// Current simulated tilt angle in radians
    #[must_use]
    pub fn tilt_angle(&self) -> f64 {
        self.tilt_rate * self.elapsed.as_secs_f64()
    }

    /// Advance the simulated clock, delivering one sample per elapsed
    /// sampling interval.
    ///
    /// Returns the number of samples delivered.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let (kind, interval) = match &self.subscription {
            Some((kind, interval, _)) => (*kind, *interval),
            None => return 0,
        };

        self.pending += dt;
        let mut delivered = 0;

        while self.pending >= interval {
            self.pending -= interval;
            self.elapsed += interval;

            let theta = self.tilt_angle();
            let mut sample = GravityVector::new(theta.sin(), -theta.cos());

            if kind == SensorKind::Accelerometer && self.noise_amplitude > 0.0 {
                let a = self.noise_amplitude;
                sample.x += self.rng.gen_range(-a..=a);
                sample.y += self.rng.gen_range(-a..=a);
            }

            if let Some((_, _, callback)) = &mut self.subscription {
                callback(sample);
            }
            delivered += 1;
        }

        delivered
    }

    fn subscribe(
        &mut self,
        kind: SensorKind,
        available: bool,
        interval: Duration,
        callback: SampleCallback,
    ) -> Result<()> {
        if !available {
            return Err(Error::SubscriptionError(format!(
                "{kind:?} sensing not available"
            )));
        }
        if self.subscription.is_some() {
            return Err(Error::SubscriptionError(
                "already subscribed".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(Error::InvalidInput(
                "sampling interval must be positive".to_string(),
            ));
        }
        self.subscription = Some((kind, interval, callback));
        Ok(())
    }
}

impl MotionSource for SimulatedMotionSource {
    fn has_orientation_sensing(&self) -> bool {
        self.orientation_sensing
    }

    fn has_accelerometer(&self) -> bool {
        self.accelerometer
    }

    fn subscribe_orientation(&mut self, interval: Duration, callback: SampleCallback) -> Result<()> {
        self.subscribe(
            SensorKind::Orientation,
            self.orientation_sensing,
            interval,
            callback,
        )
    }

    fn subscribe_accelerometer(
        &mut self,
        interval: Duration,
        callback: SampleCallback,
    ) -> Result<()> {
        self.subscribe(
            SensorKind::Accelerometer,
            self.accelerometer,
            interval,
            callback,
        )
    }

    fn unsubscribe(&mut self) {
        self.subscription = None;
        self.pending = Duration::ZERO;
    }
}
