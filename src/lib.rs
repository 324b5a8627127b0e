//! Motion-driven display rotation pipeline.
//!
//! This library ingests device gravity/acceleration samples at a fixed
//! rate, derives a display rotation angle, and exposes that angle to a
//! render consumer. The processing chain is:
//!
//! 1. A [`motion::MotionSource`] delivers samples on a timer
//! 2. On the accelerometer path, each axis is smoothed by a
//!    [`smoothing::LowPassSignal`]
//! 3. The angle is `atan2(x, y)` corrected by
//!    [`orientation::corrected_rotation`] for the current device orientation
//! 4. The result is published for synchronous (per-sample) or decoupled
//!    (per-display-tick) consumption by a [`render::RenderSink`]
//!
//! # Examples
//!
//! ```
//! use motion_rotation::config::PipelineConfig;
//! use motion_rotation::motion::{GravityVector, ScriptedMotionSource};
//! use motion_rotation::orientation::{DeviceOrientation, FixedOrientation};
//! use motion_rotation::pipeline::MotionRotationPipeline;
//! use motion_rotation::render::{shared_sink, ConsoleRenderSink};
//! use motion_rotation::ticker::ManualTicker;
//! use std::sync::Arc;
//!
//! # fn main() -> motion_rotation::Result<()> {
//! let mut pipeline = MotionRotationPipeline::new(
//!     PipelineConfig::default(),
//!     ScriptedMotionSource::new(true, true),
//!     ManualTicker::new(),
//!     Arc::new(FixedOrientation(DeviceOrientation::Portrait)),
//!     shared_sink(ConsoleRenderSink::new()),
//! )?;
//!
//! pipeline.start()?;
//!
//! // The host pumps samples in; the display tick applies the angle
//! pipeline.source_mut().emit(GravityVector::new(0.0, -1.0));
//! pipeline.ticker_mut().tick();
//!
//! println!("rotation: {:.3} rad", pipeline.rotation_angle());
//! pipeline.stop();
//! # Ok(())
//! # }
//! ```

/// Demo application wiring
pub mod app;

/// Pipeline configuration
pub mod config;

/// Named defaults
pub mod constants;

/// Error types
pub mod error;

/// Motion sources and sample types
pub mod motion;

/// Device orientation and angle correction
pub mod orientation;

/// The motion rotation pipeline
pub mod pipeline;

/// Render sink seam
pub mod render;

/// Exponential low-pass smoothing
pub mod smoothing;

/// Display tick scheduling
pub mod ticker;

pub use error::{Error, Result};
