//! CLI command implementations

pub mod replay;
pub mod simulate;

use std::path::PathBuf;

use clap::Args;
use streamwatch_detector::{DetectorConfig, DetectorSnapshot};
use streamwatch_io::JsonSnapshotFile;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::CliResult;

/// Detector overrides shared by the streaming commands
#[derive(Args, Debug, Clone, Default)]
pub struct DetectorArgs {
    /// Trailing window size (W)
    #[arg(short, long, env = "STREAMWATCH_WINDOW")]
    pub window: Option<usize>,

    /// Threshold multiplier (k)
    #[arg(short = 'k', long, env = "STREAMWATCH_MULTIPLIER")]
    pub multiplier: Option<f64>,
}

impl DetectorArgs {
    /// Apply flags over the file configuration and validate the result
    pub fn resolve(&self, base: DetectorConfig) -> CliResult<DetectorConfig> {
        let config = DetectorConfig {
            window_size: self.window.unwrap_or(base.window_size),
            threshold_multiplier: self.multiplier.unwrap_or(base.threshold_multiplier),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Output overrides shared by the streaming commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory for input_data.txt, output_data.txt and anomalies.txt
    #[arg(long, env = "STREAMWATCH_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Write the final detector snapshot as JSON to this path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log a progress frame every N samples
    #[arg(long)]
    pub frame_every: Option<u64>,
}

impl OutputArgs {
    pub fn resolve(&self, base: &OutputConfig) -> OutputConfig {
        OutputConfig {
            dir: self.out_dir.clone().unwrap_or_else(|| base.dir.clone()),
            snapshot: self.snapshot.clone().or_else(|| base.snapshot.clone()),
            frame_every: self.frame_every.or(base.frame_every).filter(|n| *n > 0),
        }
    }
}

/// Emits periodic progress frames in place of a live chart
pub struct FrameReporter {
    every: Option<u64>,
    snapshot_file: Option<JsonSnapshotFile>,
}

impl FrameReporter {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            every: output.frame_every,
            snapshot_file: output.snapshot.as_ref().map(JsonSnapshotFile::new),
        }
    }

    /// Whether a frame is due after `processed` samples
    pub fn is_due(&self, processed: u64) -> bool {
        matches!(self.every, Some(n) if processed % n == 0)
    }

    /// End of the next batch starting after `processed` samples: at most
    /// `max_batch` samples ahead, and never past the next frame.
    pub fn next_boundary(&self, processed: u64, max_batch: u64) -> u64 {
        let batch_end = processed + max_batch.max(1);
        match self.every {
            Some(n) => batch_end.min((processed / n + 1) * n),
            None => batch_end,
        }
    }

    /// Log the frame and refresh the snapshot file, if any
    pub fn frame(&self, snapshot: &DetectorSnapshot) -> CliResult<()> {
        match (snapshot.statistics, snapshot.lower_threshold, snapshot.upper_threshold) {
            (Some(stats), Some(lower), Some(upper)) => info!(
                samples = snapshot.samples_ingested,
                mean = stats.mean,
                std_dev = stats.std_dev,
                lower,
                upper,
                anomalies = snapshot.anomaly_count(),
                "frame"
            ),
            _ => info!(
                samples = snapshot.samples_ingested,
                window = snapshot.window_len,
                "frame (warming up)"
            ),
        }
        self.write_snapshot(snapshot)
    }

    /// Write the snapshot file, if one is configured
    pub fn write_snapshot(&self, snapshot: &DetectorSnapshot) -> CliResult<()> {
        if let Some(file) = &self.snapshot_file {
            file.write(snapshot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_flags_override_file() {
        let args = DetectorArgs {
            window: Some(8),
            multiplier: None,
        };
        let config = args.resolve(DetectorConfig::default()).unwrap();
        assert_eq!(config.window_size, 8);
        assert_eq!(config.threshold_multiplier, 3.0);
    }

    #[test]
    fn invalid_override_rejected() {
        let args = DetectorArgs {
            window: Some(0),
            multiplier: None,
        };
        assert!(args.resolve(DetectorConfig::default()).is_err());
    }

    #[test]
    fn output_flags_override_file() {
        let base = OutputConfig {
            frame_every: Some(10),
            ..OutputConfig::default()
        };
        let args = OutputArgs {
            out_dir: Some(PathBuf::from("/tmp/elsewhere")),
            snapshot: None,
            frame_every: Some(0),
        };
        let resolved = args.resolve(&base);
        assert_eq!(resolved.dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(resolved.frame_every, None);
    }

    #[test]
    fn frames_due_on_multiples() {
        let reporter = FrameReporter::new(&OutputConfig {
            frame_every: Some(5),
            ..OutputConfig::default()
        });
        assert!(!reporter.is_due(4));
        assert!(reporter.is_due(5));
        assert!(reporter.is_due(10));

        let silent = FrameReporter::new(&OutputConfig::default());
        assert!(!silent.is_due(5));
    }

    #[test]
    fn batches_stop_at_frames() {
        let reporter = FrameReporter::new(&OutputConfig {
            frame_every: Some(100),
            ..OutputConfig::default()
        });
        assert_eq!(reporter.next_boundary(0, 1024), 100);
        assert_eq!(reporter.next_boundary(100, 1024), 200);
        assert_eq!(reporter.next_boundary(150, 30), 180);

        let sparse = FrameReporter::new(&OutputConfig {
            frame_every: Some(5000),
            ..OutputConfig::default()
        });
        assert_eq!(sparse.next_boundary(0, 1024), 1024);
        assert_eq!(sparse.next_boundary(4096, 1024), 5000);

        let silent = FrameReporter::new(&OutputConfig::default());
        assert_eq!(silent.next_boundary(7, 1024), 1031);
    }
}
