//! The motion rotation pipeline: sampling lifecycle, angle computation and
//! publication.
//!
//! The pipeline subscribes to a [`MotionSource`] on `start()`, picking the
//! best available sensor once and dispatching on the resulting
//! [`SensorMode`] for its whole run. Gyroscope-fused gravity samples are
//! already low-noise and skip smoothing; raw accelerometer samples pass
//! through a per-axis low-pass filter first. Each accepted sample becomes
//! `atan2(x, y)`, is corrected for the current device orientation, and is
//! published into a [`RotationCell`] that the render consumer reads either
//! per sample (synchronous) or on its own display tick (decoupled).

use crate::config::{ConsumptionMode, PipelineConfig};
use crate::motion::{MotionSource, SampleCallback};
use crate::orientation::{corrected_rotation, normalize_angle, OrientationProvider};
use crate::render::SharedSink;
use crate::smoothing::LowPassSignal;
use crate::ticker::DisplayTicker;
use crate::Result;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Sensor capability selected once at `start()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
    /// Gyroscope-fused gravity samples; no smoothing needed
    Full,
    /// Raw accelerometer samples; smoothed per axis before use
    AccelOnly,
    /// No motion sensing at all; the pipeline runs but never updates
    Unavailable,
}

/// Published rotation angle, shared between the ingestion callback (sole
/// writer) and the render consumer (sole reader).
///
/// The angle is stored as raw `f64` bits in an `AtomicU64`, so reads can
/// never observe a torn value even when the host delivers motion callbacks
/// and display ticks on different threads.
#[derive(Debug)]
pub struct RotationCell(AtomicU64);

impl RotationCell {
    /// Create a cell holding the given angle
    #[must_use]
    pub fn new(angle: f64) -> Self {
        Self(AtomicU64::new(angle.to_bits()))
    }

    /// Publish a new angle
    pub fn store(&self, angle: f64) {
        self.0.store(angle.to_bits(), Ordering::Release);
    }

    /// Read the most recently published angle
    #[must_use]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

/// Owns the sampling lifecycle and produces the consumable rotation angle.
///
/// Lifecycle is Stopped → Running → Stopped via [`start`] and [`stop`];
/// both are safe to call redundantly. A sample callback already in flight
/// when `stop()` runs may complete and publish one final angle; that last
/// write is harmless and deliberately not synchronized away.
///
/// [`start`]: MotionRotationPipeline::start
/// [`stop`]: MotionRotationPipeline::stop
pub struct MotionRotationPipeline<S: MotionSource, T: DisplayTicker> {
    config: PipelineConfig,
    source: S,
    ticker: T,
    orientation: Arc<dyn OrientationProvider + Send + Sync>,
    sink: SharedSink,
    angle: Arc<RotationCell>,
    smoothers: Arc<Mutex<(LowPassSignal, LowPassSignal)>>,
    dropped: Arc<AtomicU64>,
    mode: Option<SensorMode>,
}

impl<S: MotionSource, T: DisplayTicker> MotionRotationPipeline<S, T> {
    /// Create a stopped pipeline.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(
        config: PipelineConfig,
        source: S,
        ticker: T,
        orientation: Arc<dyn OrientationProvider + Send + Sync>,
        sink: SharedSink,
    ) -> Result<Self> {
        config.validate()?;

        let factor = config.smoothing_factor;

        Ok(Self {
            config,
            source,
            ticker,
            orientation,
            sink,
            angle: Arc::new(RotationCell::new(0.0)),
            smoothers: Arc::new(Mutex::new((
                LowPassSignal::new(0.0, factor),
                LowPassSignal::new(0.0, factor),
            ))),
            dropped: Arc::new(AtomicU64::new(0)),
            mode: None,
        })
    }

    /// Probe sensor capabilities and begin ingesting samples.
    ///
    /// Prefers full orientation sensing, falls back to the plain
    /// accelerometer, and degrades to a logged inert state when neither is
    /// available. Calling `start()` on a running pipeline is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.mode.is_some() {
            debug!("start() ignored: pipeline already running");
            return Ok(());
        }

        let interval = self.config.sampling_interval();

        let mode = if self.source.has_orientation_sensing() {
            let callback = self.ingest_callback(false);
            self.source.subscribe_orientation(interval, callback)?;
            SensorMode::Full
        } else if self.source.has_accelerometer() {
            let callback = self.ingest_callback(true);
            self.source.subscribe_accelerometer(interval, callback)?;
            SensorMode::AccelOnly
        } else {
            warn!("motion updates not available: rotation angle will never change");
            SensorMode::Unavailable
        };

        if mode != SensorMode::Unavailable && self.config.consumption == ConsumptionMode::Decoupled
        {
            let angle = Arc::clone(&self.angle);
            let sink = Arc::clone(&self.sink);
            self.ticker.register(Box::new(move || {
                let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                sink.apply_rotation(angle.load());
            }));
        }

        debug!("pipeline started in {mode:?} mode");
        self.mode = Some(mode);
        Ok(())
    }

    /// Stop ingesting samples.
    ///
    /// The published angle keeps its last value. Calling `stop()` on a
    /// stopped pipeline is a no-op.
    pub fn stop(&mut self) {
        match self.mode.take() {
            None => debug!("stop() ignored: pipeline not running"),
            Some(SensorMode::Unavailable) => {}
            Some(_) => {
                self.source.unsubscribe();
                self.ticker.deregister();
                debug!("pipeline stopped");
            }
        }
    }

    /// Most recently published rotation angle in radians.
    ///
    /// 0.0 until a first sample arrives; retains its last value after
    /// `stop()`.
    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        self.angle.load()
    }

    /// Handle to the published angle for readers on other threads
    #[must_use]
    pub fn rotation_cell(&self) -> Arc<RotationCell> {
        Arc::clone(&self.angle)
    }

    /// Sensor mode selected at `start()`, or None when stopped
    #[must_use]
    pub fn sensor_mode(&self) -> Option<SensorMode> {
        self.mode
    }

    /// True between `start()` and `stop()`, including the inert
    /// `Unavailable` state
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.mode.is_some()
    }

    /// Number of non-finite samples dropped since creation
    #[must_use]
    pub fn dropped_samples(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Access the motion source, e.g. to pump a simulated implementation
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Access the display ticker, e.g. to fire it from a render loop
    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    /// Build the per-sample ingestion callback.
    ///
    /// The per-axis filter state is owned by the pipeline and shared with
    /// the callback: created once in `new()` and never reset, so smoothing
    /// history survives stop/start cycles.
    fn ingest_callback(&self, smooth: bool) -> SampleCallback {
        let angle = Arc::clone(&self.angle);
        let dropped = Arc::clone(&self.dropped);
        let orientation = Arc::clone(&self.orientation);
        let sink = (self.config.consumption == ConsumptionMode::Synchronous)
            .then(|| Arc::clone(&self.sink));
        let normalize = self.config.normalize_angle;

        let smoothers = smooth.then(|| Arc::clone(&self.smoothers));

        Box::new(move |sample| {
            if !sample.is_finite() {
                dropped.fetch_add(1, Ordering::Relaxed);
                debug!("dropped non-finite sample {sample:?}");
                return;
            }

            let gravity = match &smoothers {
                Some(state) => {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    state.0 = state.0.update(sample.x);
                    state.1 = state.1.update(sample.y);
                    crate::motion::GravityVector::new(state.0.value(), state.1.value())
                }
                None => sample,
            };

            let mut rotation =
                corrected_rotation(gravity.rotation_angle(), orientation.orientation());
            if normalize {
                rotation = normalize_angle(rotation);
            }

            angle.store(rotation);

            if let Some(sink) = &sink {
                let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                sink.apply_rotation(rotation);
            }
        })
    }
}

impl<S: MotionSource, T: DisplayTicker> Drop for MotionRotationPipeline<S, T> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{GravityVector, ScriptedMotionSource};
    use crate::orientation::{DeviceOrientation, FixedOrientation};
    use crate::render::RenderSink;
    use crate::ticker::ManualTicker;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        applied: Vec<f64>,
    }

    impl RenderSink for RecordingSink {
        fn apply_rotation(&mut self, angle_radians: f64) {
            self.applied.push(angle_radians);
        }
    }

    type TestPipeline = MotionRotationPipeline<ScriptedMotionSource, ManualTicker>;

    fn pipeline_with(
        config: PipelineConfig,
        orientation_sensing: bool,
        accelerometer: bool,
    ) -> (TestPipeline, Arc<Mutex<RecordingSink>>) {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let pipeline = MotionRotationPipeline::new(
            config,
            ScriptedMotionSource::new(orientation_sensing, accelerometer),
            ManualTicker::new(),
            Arc::new(FixedOrientation(DeviceOrientation::PortraitUpsideDown)),
            sink.clone(),
        )
        .unwrap();
        (pipeline, sink)
    }

    fn applied(sink: &Arc<Mutex<RecordingSink>>) -> Vec<f64> {
        sink.lock().unwrap().applied.clone()
    }

    #[test]
    fn test_synchronous_mode_applies_per_sample() {
        let config = PipelineConfig {
            consumption: ConsumptionMode::Synchronous,
            ..Default::default()
        };
        let (mut pipeline, sink) = pipeline_with(config, true, false);

        pipeline.start().unwrap();
        assert_eq!(pipeline.sensor_mode(), Some(SensorMode::Full));

        pipeline.source_mut().emit(GravityVector::new(0.0, 1.0));
        pipeline.source_mut().emit(GravityVector::new(1.0, 0.0));

        let applied = applied(&sink);
        assert_eq!(applied.len(), 2);
        assert!(applied[0].abs() < 1e-12);
        assert!((applied[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_decoupled_mode_caches_until_tick() {
        let (mut pipeline, sink) = pipeline_with(PipelineConfig::default(), true, false);

        pipeline.start().unwrap();

        for i in 0..5 {
            let theta = f64::from(i) * 0.1;
            pipeline
                .source_mut()
                .emit(GravityVector::new(theta.sin(), theta.cos()));
        }
        assert!(applied(&sink).is_empty());

        let latest = pipeline.rotation_angle();
        assert!(pipeline.ticker_mut().tick());

        let applied = applied(&sink);
        assert_eq!(applied, vec![latest]);
        assert!((latest - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_unavailable_source_stays_inert() {
        let (mut pipeline, sink) = pipeline_with(PipelineConfig::default(), false, false);

        pipeline.start().unwrap();
        assert_eq!(pipeline.sensor_mode(), Some(SensorMode::Unavailable));
        assert!(pipeline.is_running());

        // No ticker callback was registered; the sink is never invoked
        assert!(!pipeline.ticker_mut().tick());
        assert!(applied(&sink).is_empty());
        assert_eq!(pipeline.rotation_angle(), 0.0);

        pipeline.stop();
        assert!(!pipeline.is_running());
    }

    #[test]
    fn test_accelerometer_fallback_selects_accel_mode() {
        let (mut pipeline, _sink) = pipeline_with(PipelineConfig::default(), false, true);
        pipeline.start().unwrap();
        assert_eq!(pipeline.sensor_mode(), Some(SensorMode::AccelOnly));
        assert!(pipeline.source_mut().is_subscribed());
    }

    #[test]
    fn test_accelerometer_path_smooths_samples() {
        let (mut pipeline, _sink) = pipeline_with(PipelineConfig::default(), false, true);
        pipeline.start().unwrap();

        // Gravity straight down, then one jittery outlier on x
        pipeline.source_mut().emit(GravityVector::new(0.0, -1.0));
        pipeline.source_mut().emit(GravityVector::new(1.0, -1.0));

        // After two updates the filters hold x = 0.15, y = -0.2775
        let expected = 0.15_f64.atan2(-0.2775);
        let raw_outlier_angle = 1.0_f64.atan2(-1.0);
        let smoothed_angle = pipeline.rotation_angle();
        assert!((smoothed_angle - expected).abs() < 1e-9);
        assert!((smoothed_angle - raw_outlier_angle).abs() > 0.1);
    }

    #[test]
    fn test_smoothing_history_survives_restart() {
        let (mut pipeline, _sink) = pipeline_with(PipelineConfig::default(), false, true);

        pipeline.start().unwrap();
        for _ in 0..500 {
            pipeline.source_mut().emit(GravityVector::new(0.0, 1.0));
        }
        pipeline.stop();

        pipeline.start().unwrap();
        pipeline.source_mut().emit(GravityVector::new(1.0, 0.0));

        // The filters converged to (0, 1) before the restart; one outlier
        // moves them to (0.15, 0.85) rather than passing through against
        // freshly zeroed state.
        let expected = 0.15_f64.atan2(0.85);
        assert!((pipeline.rotation_angle() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_double_start_is_noop() {
        let (mut pipeline, sink) = pipeline_with(
            PipelineConfig {
                consumption: ConsumptionMode::Synchronous,
                ..Default::default()
            },
            true,
            false,
        );

        pipeline.start().unwrap();
        pipeline.start().unwrap();

        pipeline.source_mut().emit(GravityVector::new(0.0, 1.0));
        assert_eq!(applied(&sink).len(), 1);
    }

    #[test]
    fn test_stop_twice_retains_last_angle() {
        let (mut pipeline, _sink) = pipeline_with(PipelineConfig::default(), true, false);

        pipeline.start().unwrap();
        pipeline.source_mut().emit(GravityVector::new(1.0, 0.0));
        let angle = pipeline.rotation_angle();
        assert!(angle != 0.0);

        pipeline.stop();
        pipeline.stop();
        assert_eq!(pipeline.rotation_angle(), angle);
        assert!(!pipeline.source_mut().is_subscribed());
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let (mut pipeline, _sink) = pipeline_with(PipelineConfig::default(), true, true);
        pipeline.stop();
        assert!(!pipeline.is_running());
    }

    #[test]
    fn test_malformed_samples_are_dropped() {
        let (mut pipeline, sink) = pipeline_with(
            PipelineConfig {
                consumption: ConsumptionMode::Synchronous,
                ..Default::default()
            },
            true,
            false,
        );

        pipeline.start().unwrap();
        pipeline.source_mut().emit(GravityVector::new(1.0, 0.0));
        let angle = pipeline.rotation_angle();

        pipeline.source_mut().emit(GravityVector::new(f64::NAN, 0.0));
        pipeline
            .source_mut()
            .emit(GravityVector::new(0.0, f64::INFINITY));

        assert_eq!(pipeline.dropped_samples(), 2);
        assert_eq!(pipeline.rotation_angle(), angle);
        assert_eq!(applied(&sink).len(), 1);
    }

    #[test]
    fn test_normalize_flag_wraps_angle() {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let mut pipeline = MotionRotationPipeline::new(
            PipelineConfig {
                normalize_angle: true,
                ..Default::default()
            },
            ScriptedMotionSource::new(true, false),
            ManualTicker::new(),
            Arc::new(FixedOrientation(DeviceOrientation::Portrait)),
            sink.clone(),
        )
        .unwrap();

        pipeline.start().unwrap();
        // Raw angle atan2(-0.1, 1) is slightly negative; Portrait subtracts π,
        // putting the corrected angle below -π until normalized.
        pipeline.source_mut().emit(GravityVector::new(-0.1, 1.0));

        let angle = pipeline.rotation_angle();
        assert!(angle > -std::f64::consts::PI && angle <= std::f64::consts::PI);
    }

    #[test]
    fn test_rotation_cell_roundtrip() {
        let cell = RotationCell::new(1.5);
        assert_eq!(cell.load(), 1.5);
        cell.store(-2.25);
        assert_eq!(cell.load(), -2.25);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let result = MotionRotationPipeline::new(
            PipelineConfig {
                smoothing_factor: 1.5,
                ..Default::default()
            },
            ScriptedMotionSource::new(true, true),
            ManualTicker::new(),
            Arc::new(FixedOrientation(DeviceOrientation::Portrait)),
            sink,
        );
        assert!(result.is_err());
    }
}
