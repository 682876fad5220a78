//! # streamwatch-detector
//!
//! Windowed anomaly detection for ordered numeric streams.
//!
//! Each sample is classified against the `W` samples that preceded it: the
//! sample is anomalous iff its absolute deviation from the window mean
//! exceeds `k` times the window's population standard deviation.
//!
//! ## Architecture
//!
//! ```text
//!   producer ──► DetectorHandle::submit ──► mpsc ──► ingest loop (single consumer)
//!                                                        │
//!   replay / direct calls ────────────────────────► WindowedAnomalyDetector
//!                                                        │  ┌──────────────┐
//!                                                        │  │SlidingWindow │ ← last W values
//!                                                        │  └──────────────┘
//!                                                        │  ┌──────────────┐
//!                                                        │  │ anomalies    │ ← append-only
//!                                                        │  └──────────────┘
//!                                                        ▼
//!                                   ClassificationResult / ClassifiedSample ──► sinks
//!                                                        │ snapshot()
//!                                                        ▼
//!                                                 DetectorSnapshot ──► display
//! ```
//!
//! ## Invariants
//!
//! - The window never holds more than `W` values and never contains the
//!   sample being classified.
//! - The first `W` samples yield `Warmup`; every later sample is classified.
//! - Anomaly records are only ever appended, in index order.
//! - A failed `ingest` leaves the detector unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use streamwatch_detector::{indexed, AnomalyRecord, WindowedAnomalyDetector};
//!
//! let mut detector = WindowedAnomalyDetector::configure(3, 3.0).unwrap();
//! detector
//!     .replay(indexed(vec![10.0, 10.0, 10.0, 10.0, 100.0]))
//!     .unwrap();
//!
//! assert_eq!(
//!     detector.anomalies(),
//!     vec![AnomalyRecord { index: 4, value: 100.0 }]
//! );
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod detector;
pub mod error;
pub mod service;
pub mod snapshot;
pub mod types;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::{DetectorConfig, DEFAULT_THRESHOLD_MULTIPLIER, DEFAULT_WINDOW_SIZE};
pub use detector::WindowedAnomalyDetector;
pub use error::{DetectorError, DetectorResult};
pub use service::{DetectorHandle, DetectorService, ResultReceiver, DEFAULT_CHANNEL_CAPACITY};
pub use snapshot::DetectorSnapshot;
pub use types::{
    indexed, AnomalyRecord, ClassificationResult, ClassifiedSample, Sample, WindowStatistics,
};
pub use window::SlidingWindow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_seasonal_stream_with_spikes() {
        // Saw-tooth with small alternating jitter, two injected spikes.
        let mut values: Vec<f64> = (0..400)
            .map(|i| 10.0 * (i % 100) as f64 / 100.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        values[150] = 40.0;
        values[320] = -40.0;

        let mut detector = WindowedAnomalyDetector::new(DetectorConfig::default()).unwrap();
        let results = detector.replay(indexed(values)).unwrap();

        assert_eq!(results.iter().filter(|r| r.is_warmup()).count(), 50);
        let flagged: Vec<u64> = detector.anomalies().iter().map(|a| a.index).collect();
        assert!(flagged.contains(&150));
        assert!(flagged.contains(&320));
    }

    #[test]
    fn all_public_types_accessible() {
        let _config = DetectorConfig::default();
        let _window = SlidingWindow::new(DEFAULT_WINDOW_SIZE);
        let _sample = Sample::new(0, 1.0);
        let _record = AnomalyRecord {
            index: 0,
            value: 1.0,
        };
        let _result = ClassificationResult::Warmup;
        let _classified = ClassifiedSample::new(_sample, _result);
        let _error = DetectorError::ServiceStopped;
        let detector = WindowedAnomalyDetector::configure(4, DEFAULT_THRESHOLD_MULTIPLIER).unwrap();
        let _snapshot: DetectorSnapshot = detector.snapshot();
        let _service = DetectorService::new(detector).with_channel_capacity(DEFAULT_CHANNEL_CAPACITY);
    }
}
