//! Motion rotation demo: simulated device tilt driving a rotation angle.

use anyhow::Result;
use clap::Parser;
use log::info;
use motion_rotation::app::{AppConfig, MotionRotationApp};
use motion_rotation::config::{ConsumptionMode, PipelineConfig};
use motion_rotation::orientation::DeviceOrientation;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Consumption mode (synchronous, decoupled)
    #[arg(short, long, default_value = "decoupled")]
    mode: String,

    /// Device orientation (portrait, upside_down, landscape_left,
    /// landscape_right, other)
    #[arg(short, long, default_value = "portrait")]
    orientation: String,

    /// Pretend orientation sensing is unavailable (accelerometer path)
    #[arg(long)]
    accel_only: bool,

    /// How long to run, in seconds
    #[arg(long, default_value = "5.0")]
    duration: f64,

    /// Simulated tilt rate in radians per second
    #[arg(long, default_value = "0.5")]
    tilt_rate: f64,

    /// Simulated accelerometer noise amplitude
    #[arg(long, default_value = "0.15")]
    noise: f64,

    /// Normalize published angles into (-pi, pi]
    #[arg(short, long)]
    normalize: bool,

    /// Run as fast as possible instead of wall-clock pacing
    #[arg(long)]
    fast: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Motion Rotation Pipeline");

    let mut pipeline_config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match PipelineConfig::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                PipelineConfig::default()
            }
        }
    } else {
        PipelineConfig::default()
    };

    pipeline_config.consumption = match args.mode.as_str() {
        "synchronous" | "sync" => ConsumptionMode::Synchronous,
        _ => ConsumptionMode::Decoupled,
    };
    if args.normalize {
        pipeline_config.normalize_angle = true;
    }

    let config = AppConfig {
        pipeline: pipeline_config,
        orientation: match args.orientation.as_str() {
            "upside_down" => DeviceOrientation::PortraitUpsideDown,
            "landscape_left" => DeviceOrientation::LandscapeLeft,
            "landscape_right" => DeviceOrientation::LandscapeRight,
            "other" => DeviceOrientation::Other,
            _ => DeviceOrientation::Portrait,
        },
        force_accelerometer: args.accel_only,
        duration: Duration::from_secs_f64(args.duration.max(0.0)),
        tilt_rate: args.tilt_rate,
        noise_amplitude: args.noise,
        realtime: !args.fast,
    };

    let mut app = MotionRotationApp::new(config)?;
    app.run()?;

    Ok(())
}
