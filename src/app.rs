//! Demo application wiring for the motion rotation pipeline.
//!
//! Stands in for the platform glue around the core: a simulated motion
//! source supplies samples, an interval ticker plays the display link, and
//! a console sink receives the final angle. One loop drives both clocks,
//! matching the single-logical-owner scheduling model of the pipeline.

use crate::config::PipelineConfig;
use crate::motion::SimulatedMotionSource;
use crate::orientation::{DeviceOrientation, FixedOrientation};
use crate::pipeline::MotionRotationPipeline;
use crate::render::ConsoleRenderSink;
use crate::ticker::IntervalTicker;
use crate::Result;
use log::info;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Demo application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pipeline configuration
    pub pipeline: PipelineConfig,
    /// Fixed device orientation for the run
    pub orientation: DeviceOrientation,
    /// Pretend orientation sensing is missing to exercise the smoothing path
    pub force_accelerometer: bool,
    /// How long to run
    pub duration: Duration,
    /// Simulated tilt rate in radians per second
    pub tilt_rate: f64,
    /// Simulated accelerometer noise amplitude
    pub noise_amplitude: f64,
    /// Sleep between steps so the run plays out in wall-clock time
    pub realtime: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            orientation: DeviceOrientation::Portrait,
            force_accelerometer: false,
            duration: Duration::from_secs(5),
            tilt_rate: crate::constants::DEFAULT_TILT_RATE,
            noise_amplitude: crate::constants::DEFAULT_NOISE_AMPLITUDE,
            realtime: true,
        }
    }
}

/// Demo application: simulated source → pipeline → console sink
pub struct MotionRotationApp {
    pipeline: MotionRotationPipeline<SimulatedMotionSource, IntervalTicker>,
    sink: Arc<Mutex<ConsoleRenderSink>>,
    duration: Duration,
    step: Duration,
    realtime: bool,
}

impl MotionRotationApp {
    /// Build the application from its configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = SimulatedMotionSource::new(!config.force_accelerometer, true)
            .with_tilt_rate(config.tilt_rate)
            .with_noise_amplitude(config.noise_amplitude);

        let ticker = IntervalTicker::from_refresh_rate(config.pipeline.display_refresh_hz);
        let step = config.pipeline.display_refresh_interval();

        let sink = Arc::new(Mutex::new(ConsoleRenderSink::new()));

        let pipeline = MotionRotationPipeline::new(
            config.pipeline,
            source,
            ticker,
            Arc::new(FixedOrientation(config.orientation)),
            sink.clone(),
        )?;

        Ok(Self {
            pipeline,
            sink,
            duration: config.duration,
            step,
            realtime: config.realtime,
        })
    }

    /// Run the pipeline for the configured duration, then stop it.
    ///
    /// Returns the final rotation angle in radians.
    pub fn run(&mut self) -> Result<f64> {
        info!("starting motion rotation pipeline");
        self.pipeline.start()?;

        if let Some(mode) = self.pipeline.sensor_mode() {
            info!("sensor mode: {mode:?}");
        }

        let run_start = Instant::now();
        let mut elapsed = Duration::ZERO;
        let mut since_report = Duration::ZERO;

        while elapsed < self.duration {
            self.pipeline.source_mut().advance(self.step);
            self.pipeline.ticker_mut().advance(self.step);

            elapsed += self.step;
            since_report += self.step;

            if since_report >= Duration::from_millis(500) {
                since_report = Duration::ZERO;
                info!(
                    "t={:.1}s rotation angle {:.4} rad ({:.1}°)",
                    elapsed.as_secs_f64(),
                    self.pipeline.rotation_angle(),
                    self.pipeline.rotation_angle().to_degrees()
                );
            }

            if self.realtime {
                // Sleep to the deadline rather than a full step, so loop
                // work does not accumulate as wall-clock drift
                let deadline = run_start + elapsed;
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                }
            }
        }

        self.pipeline.stop();

        let dropped = self.pipeline.dropped_samples();
        if dropped > 0 {
            info!("dropped {dropped} malformed samples");
        }

        info!("applied {} rotations to the render sink", self.applied_rotations());

        let angle = self.pipeline.rotation_angle();
        info!("final rotation angle {angle:.4} rad");
        Ok(angle)
    }

    /// Number of rotations the render sink has applied
    #[must_use]
    pub fn applied_rotations(&self) -> u64 {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .applied_count()
    }

    /// Access the pipeline, e.g. for inspection after a run
    pub fn pipeline(
        &self,
    ) -> &MotionRotationPipeline<SimulatedMotionSource, IntervalTicker> {
        &self.pipeline
    }
}
