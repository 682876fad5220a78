//! Sample sinks: consumers of per-sample verdicts.
//!
//! A sink receives every `ClassifiedSample` in stream order and decides
//! how to encode it. `TextFileSink` writes the plain-text layout used by
//! recorded streams; `InMemorySink` keeps everything for inspection.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use streamwatch_detector::{AnomalyRecord, ClassifiedSample};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Raw stream, one `index, value` line per sample.
pub const INPUT_FILE_NAME: &str = "input_data.txt";

/// Raw stream with anomalies suffixed by ` *`.
pub const OUTPUT_FILE_NAME: &str = "output_data.txt";

/// One line per flagged index.
pub const ANOMALIES_FILE_NAME: &str = "anomalies.txt";

/// Consumer of classified samples, fed in stream order.
pub trait SampleSink {
    /// Accept the verdict for one sample.
    fn record(&mut self, sample: &ClassifiedSample) -> IoResult<()>;

    /// Flush buffered output. Further `record` calls may fail.
    fn finish(&mut self) -> IoResult<()> {
        Ok(())
    }

    /// Feed a batch in order.
    fn record_all<'a, I>(&mut self, samples: I) -> IoResult<()>
    where
        I: IntoIterator<Item = &'a ClassifiedSample>,
        Self: Sized,
    {
        for sample in samples {
            self.record(sample)?;
        }
        Ok(())
    }
}

/// Format a sample as `index, value` with four decimals. The rounding is
/// lossy; see [`read_samples`](crate::read_samples).
pub fn format_sample_line(index: u64, value: f64) -> String {
    format!("{}, {:.4}", index, value)
}

// ── Text files ──────────────────────────────────────────────────────────

struct TextWriters {
    input: BufWriter<File>,
    output: BufWriter<File>,
    anomalies: BufWriter<File>,
}

/// Writes the three-file text layout into a directory.
///
/// ```text
///   input_data.txt    0, 1.2345
///   output_data.txt   200, 20.0000 *
///   anomalies.txt     Anomaly detected at index: 200
/// ```
pub struct TextFileSink {
    dir: PathBuf,
    writers: Option<TextWriters>,
    records: u64,
    anomalies: u64,
}

impl TextFileSink {
    /// Create the directory if needed and truncate the three files.
    pub fn create(dir: impl Into<PathBuf>) -> IoResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let open = |name: &str| -> IoResult<BufWriter<File>> {
            Ok(BufWriter::new(File::create(dir.join(name))?))
        };
        let writers = TextWriters {
            input: open(INPUT_FILE_NAME)?,
            output: open(OUTPUT_FILE_NAME)?,
            anomalies: open(ANOMALIES_FILE_NAME)?,
        };
        debug!(dir = %dir.display(), "text sink opened");
        Ok(Self {
            dir,
            writers: Some(writers),
            records: 0,
            anomalies: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.join(INPUT_FILE_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE_NAME)
    }

    pub fn anomalies_path(&self) -> PathBuf {
        self.dir.join(ANOMALIES_FILE_NAME)
    }

    /// Samples written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Anomaly lines written so far.
    pub fn anomalies_written(&self) -> u64 {
        self.anomalies
    }
}

impl SampleSink for TextFileSink {
    fn record(&mut self, sample: &ClassifiedSample) -> IoResult<()> {
        let writers = self.writers.as_mut().ok_or(IoError::SinkFinished)?;
        let line = format_sample_line(sample.index, sample.value);

        writeln!(writers.input, "{}", line)?;
        if sample.is_anomaly {
            writeln!(writers.output, "{} *", line)?;
            writeln!(writers.anomalies, "Anomaly detected at index: {}", sample.index)?;
            self.anomalies += 1;
        } else {
            writeln!(writers.output, "{}", line)?;
        }
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        if let Some(mut writers) = self.writers.take() {
            writers.input.flush()?;
            writers.output.flush()?;
            writers.anomalies.flush()?;
            debug!(
                dir = %self.dir.display(),
                records = self.records,
                anomalies = self.anomalies,
                "text sink finished"
            );
        }
        Ok(())
    }
}

// ── In memory ───────────────────────────────────────────────────────────

/// Keeps every classified sample in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Vec<ClassifiedSample>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ClassifiedSample] {
        &self.records
    }

    /// Flagged samples, in stream order.
    pub fn anomalies(&self) -> Vec<AnomalyRecord> {
        self.records
            .iter()
            .filter(|r| r.is_anomaly)
            .map(|r| AnomalyRecord::from(r.sample()))
            .collect()
    }

    pub fn into_records(self) -> Vec<ClassifiedSample> {
        self.records
    }
}

impl SampleSink for InMemorySink {
    fn record(&mut self, sample: &ClassifiedSample) -> IoResult<()> {
        self.records.push(*sample);
        Ok(())
    }
}
