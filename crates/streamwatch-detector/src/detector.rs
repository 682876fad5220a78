//! The windowed anomaly detector.
//!
//! Each ingested sample is compared against the W samples that preceded
//! it. While fewer than W samples have arrived the verdict is `Warmup`.
//! After that, the sample is anomalous iff `|value - mean| > k·σ`, where
//! `mean` and `σ` (population) are recomputed from the window on every
//! call. The sample is pushed into the window only after its verdict.

use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::error::{DetectorError, DetectorResult};
use crate::snapshot::DetectorSnapshot;
use crate::types::{AnomalyRecord, ClassificationResult, Sample, WindowStatistics};
use crate::window::SlidingWindow;

/// Streaming k-sigma detector over a fixed-size trailing window.
///
/// Owns its window and anomaly list exclusively. A failed `ingest`
/// leaves both untouched.
#[derive(Clone, Debug)]
pub struct WindowedAnomalyDetector {
    config: DetectorConfig,
    window: SlidingWindow,
    anomalies: Vec<AnomalyRecord>,
    samples_ingested: u64,
}

impl WindowedAnomalyDetector {
    /// Create a detector from a config, validating it first.
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        Ok(Self {
            window: SlidingWindow::new(config.window_size),
            config,
            anomalies: Vec::new(),
            samples_ingested: 0,
        })
    }

    /// Create a detector with window size W and multiplier k.
    pub fn configure(window_size: usize, threshold_multiplier: f64) -> DetectorResult<Self> {
        Self::new(DetectorConfig::new(window_size, threshold_multiplier)?)
    }

    /// Classify the next sample in the stream.
    ///
    /// `sample.index` must equal the number of samples ingested so far.
    pub fn ingest(&mut self, sample: Sample) -> DetectorResult<ClassificationResult> {
        if sample.index != self.samples_ingested {
            return Err(DetectorError::OutOfOrderSample {
                expected: self.samples_ingested,
                received: sample.index,
            });
        }
        if !sample.value.is_finite() {
            return Err(DetectorError::NonFiniteSample {
                index: sample.index,
            });
        }

        let result = match self.full_window_statistics() {
            None => ClassificationResult::Warmup,
            Some(stats) => {
                if stats.is_degenerate() {
                    debug!(
                        index = sample.index,
                        mean = stats.mean,
                        "degenerate window: zero standard deviation"
                    );
                }
                ClassificationResult::Classified {
                    mean: stats.mean,
                    std_dev: stats.std_dev,
                    is_anomaly: stats.is_outlier(sample.value, self.config.threshold_multiplier),
                }
            }
        };

        self.window.push(sample.value);
        self.samples_ingested += 1;

        if result.is_anomaly() {
            info!(index = sample.index, value = sample.value, "anomaly detected");
            self.anomalies.push(AnomalyRecord::from(sample));
        }
        if self.samples_ingested == self.config.window_size as u64 {
            debug!(
                window_size = self.config.window_size,
                "warm-up complete, window full"
            );
        }

        Ok(result)
    }

    /// Ingest an ordered batch, stopping at the first error.
    ///
    /// On error, state reflects every sample accepted before the failing one.
    pub fn replay<I>(&mut self, samples: I) -> DetectorResult<Vec<ClassificationResult>>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples
            .into_iter()
            .map(|sample| self.ingest(sample))
            .collect()
    }

    /// Everything flagged so far, ascending by index.
    pub fn anomalies(&self) -> Vec<AnomalyRecord> {
        self.anomalies.clone()
    }

    /// Borrowing view of the anomaly list.
    pub fn anomaly_records(&self) -> &[AnomalyRecord] {
        &self.anomalies
    }

    /// Return to the freshly configured state.
    pub fn reset(&mut self) {
        self.window.clear();
        self.anomalies.clear();
        self.samples_ingested = 0;
        debug!("detector reset");
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn samples_ingested(&self) -> u64 {
        self.samples_ingested
    }

    /// Current window contents, oldest first.
    pub fn window_values(&self) -> Vec<f64> {
        self.window.to_vec()
    }

    /// Whether warm-up has completed.
    pub fn is_warmed_up(&self) -> bool {
        self.window.is_full()
    }

    /// Statistics of the window that will classify the next sample.
    ///
    /// `None` during warm-up.
    pub fn current_statistics(&self) -> Option<WindowStatistics> {
        self.full_window_statistics()
    }

    /// `(mean - k·σ, mean + k·σ)` for the current window, `None` during warm-up.
    pub fn thresholds(&self) -> Option<(f64, f64)> {
        self.full_window_statistics()
            .map(|stats| stats.bounds(self.config.threshold_multiplier))
    }

    /// Point-in-time state for display consumers.
    pub fn snapshot(&self) -> DetectorSnapshot {
        DetectorSnapshot::capture(self)
    }

    fn full_window_statistics(&self) -> Option<WindowStatistics> {
        if self.window.is_full() {
            self.window.statistics()
        } else {
            None
        }
    }
}
