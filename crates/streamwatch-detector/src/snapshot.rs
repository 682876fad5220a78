//! Detector snapshots: point-in-time state for display consumers.
//!
//! A snapshot carries everything needed to redraw the stream view: the
//! current window statistics, the `mean ± k·σ` bounds and every anomaly
//! flagged so far. Statistics describe the window that will classify the
//! next sample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;
use crate::detector::WindowedAnomalyDetector;
use crate::types::{AnomalyRecord, WindowStatistics};

/// A point-in-time view of a [`WindowedAnomalyDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorSnapshot {
    /// When this snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Configuration of the detector.
    pub config: DetectorConfig,
    /// Samples accepted since construction or the last reset.
    pub samples_ingested: u64,
    /// Values currently held in the window.
    pub window_len: usize,
    /// Window mean and σ, absent during warm-up.
    pub statistics: Option<WindowStatistics>,
    /// `mean - k·σ`, absent during warm-up.
    pub lower_threshold: Option<f64>,
    /// `mean + k·σ`, absent during warm-up.
    pub upper_threshold: Option<f64>,
    /// All anomalies so far, ascending by index.
    pub anomalies: Vec<AnomalyRecord>,
}

impl DetectorSnapshot {
    pub(crate) fn capture(detector: &WindowedAnomalyDetector) -> Self {
        let statistics = detector.current_statistics();
        let bounds = detector.thresholds();
        Self {
            taken_at: Utc::now(),
            config: *detector.config(),
            samples_ingested: detector.samples_ingested(),
            window_len: detector.window_values().len(),
            statistics,
            lower_threshold: bounds.map(|(lo, _)| lo),
            upper_threshold: bounds.map(|(_, hi)| hi),
            anomalies: detector.anomalies(),
        }
    }

    /// Whether warm-up has completed.
    pub fn is_warmed_up(&self) -> bool {
        self.statistics.is_some()
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies.len()
    }

    /// Anomalies with index at or below `index` (the ones a display at
    /// that position would draw).
    pub fn anomalies_through(&self, index: u64) -> &[AnomalyRecord] {
        let end = self.anomalies.partition_point(|a| a.index <= index);
        &self.anomalies[..end]
    }
}
