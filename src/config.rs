//! Configuration for the motion rotation pipeline

use crate::constants::{
    DEFAULT_DISPLAY_REFRESH_HZ, DEFAULT_SAMPLING_INTERVAL_SECS, DEFAULT_SMOOTHING_FACTOR,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the render consumer receives computed angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionMode {
    /// Every ingested sample immediately applies the angle to the sink
    /// (consumer runs at sensor rate, ~100 Hz)
    Synchronous,
    /// Ingestion only caches the angle; a display tick reads and applies it
    /// (consumer runs at display refresh, ~60 Hz)
    Decoupled,
}

impl Default for ConsumptionMode {
    fn default() -> Self {
        Self::Decoupled
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Interval between motion samples, in seconds
    pub sampling_interval_secs: f64,

    /// Low-pass filter factor for the accelerometer path, in [0, 1)
    pub smoothing_factor: f64,

    /// Consumption mode for the render sink
    pub consumption: ConsumptionMode,

    /// Display refresh rate in Hz (decoupled mode only)
    pub display_refresh_hz: f64,

    /// Wrap published angles into (-π, π].
    ///
    /// Off by default: rotation transforms are periodic and accept
    /// arbitrary angles, so normalization is cosmetic for most sinks.
    pub normalize_angle: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_interval_secs: DEFAULT_SAMPLING_INTERVAL_SECS,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            consumption: ConsumptionMode::default(),
            display_refresh_hz: DEFAULT_DISPLAY_REFRESH_HZ,
            normalize_angle: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Sampling interval as a `Duration`
    #[must_use]
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_secs_f64(self.sampling_interval_secs)
    }

    /// Display refresh interval as a `Duration`
    #[must_use]
    pub fn display_refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.display_refresh_hz)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.sampling_interval_secs.is_finite() && self.sampling_interval_secs > 0.0) {
            return Err(Error::ConfigError(
                "Sampling interval must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return Err(Error::ConfigError(
                "Smoothing factor must be in [0, 1)".to_string(),
            ));
        }
        if !(self.display_refresh_hz.is_finite() && self.display_refresh_hz > 0.0) {
            return Err(Error::ConfigError(
                "Display refresh rate must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Motion Rotation Pipeline Configuration

# Interval between motion samples, in seconds (100 Hz)
sampling_interval_secs: 0.01

# Low-pass filter factor for the accelerometer path, in [0, 1)
smoothing_factor: 0.85

# Consumption mode: synchronous or decoupled
consumption: decoupled

# Display refresh rate in Hz (decoupled mode only)
display_refresh_hz: 60.0

# Wrap published angles into (-pi, pi]
normalize_angle: false
"#;
