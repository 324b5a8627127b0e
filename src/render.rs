//! Render sink: the consumer of the final rotation angle.
//!
//! The real platform applies a 2D rotation transform to a visual element;
//! here the seam is a trait so the pipeline stays free of any rendering
//! dependency. The console sink below is the demo's stand-in.

use log::debug;
use std::sync::{Arc, Mutex};

/// Receives the final rotation angle and applies it to a visual element.
pub trait RenderSink {
    /// Apply a 2D rotation transform with the given angle in radians.
    ///
    /// The angle may fall outside [-π, π]; rotation transforms are
    /// periodic, so implementations must tolerate arbitrary finite values.
    fn apply_rotation(&mut self, angle_radians: f64);
}

/// Render sink shared between the pipeline's callbacks and its owner.
///
/// Ingestion is the sole writer in synchronous mode and the display tick
/// the sole caller in decoupled mode, so the mutex is uncontended in
/// practice; it exists for hosts that deliver callbacks on another thread.
pub type SharedSink = Arc<Mutex<dyn RenderSink + Send>>;

/// Wrap a sink for handing to the pipeline
pub fn shared_sink<S: RenderSink + Send + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Sink that logs each applied rotation, used by the demo binary.
///
/// Per-application logging runs at `debug` level (pass `--debug` to the
/// binary to see it); at the default `info` level the demo reports the
/// total applied count after the run instead.
#[derive(Debug, Default)]
pub struct ConsoleRenderSink {
    applied_count: u64,
    last_angle: f64,
}

impl ConsoleRenderSink {
    /// Create a new console sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rotations applied so far
    #[must_use]
    pub const fn applied_count(&self) -> u64 {
        self.applied_count
    }

    /// Most recently applied angle in radians
    #[must_use]
    pub const fn last_angle(&self) -> f64 {
        self.last_angle
    }
}

impl RenderSink for ConsoleRenderSink {
    fn apply_rotation(&mut self, angle_radians: f64) {
        self.applied_count += 1;
        self.last_angle = angle_radians;
        debug!(
            "applied rotation {:.4} rad ({:.1}°)",
            angle_radians,
            angle_radians.to_degrees()
        );
    }
}
