//! Detector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};

/// Default trailing window length.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Default threshold multiplier (3-sigma rule).
pub const DEFAULT_THRESHOLD_MULTIPLIER: f64 = 3.0;

/// Immutable configuration for a [`WindowedAnomalyDetector`](crate::WindowedAnomalyDetector).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of trailing samples the statistics are computed over (W).
    pub window_size: usize,
    /// Multiple of the window standard deviation that marks the anomaly boundary (k).
    pub threshold_multiplier: f64,
}

impl DetectorConfig {
    /// Build a validated config.
    pub fn new(window_size: usize, threshold_multiplier: f64) -> DetectorResult<Self> {
        let config = Self {
            window_size,
            threshold_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config with the given window and the default multiplier.
    pub fn with_window(window_size: usize) -> DetectorResult<Self> {
        Self::new(window_size, DEFAULT_THRESHOLD_MULTIPLIER)
    }

    /// Check that W > 0 and k is a finite positive number.
    pub fn validate(&self) -> DetectorResult<()> {
        if self.window_size == 0 {
            return Err(DetectorError::invalid_config(
                "window_size",
                "must be greater than zero",
            ));
        }
        if !self.threshold_multiplier.is_finite() || self.threshold_multiplier <= 0.0 {
            return Err(DetectorError::invalid_config(
                "threshold_multiplier",
                format!(
                    "must be a finite positive number, got {}",
                    self.threshold_multiplier
                ),
            ));
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold_multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
        }
    }
}
