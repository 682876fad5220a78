//! Stream and classification types.
//!
//! `Sample` is what producers hand in; `ClassificationResult` is what the
//! detector hands back. `ClassifiedSample` pairs the two for sinks.

use serde::{Deserialize, Serialize};

// ── Input ───────────────────────────────────────────────────────────────

/// One observation in the stream.
///
/// `index` is the position in the stream, assigned by the producer,
/// starting at 0 and increasing by exactly 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub index: u64,
    pub value: f64,
}

impl Sample {
    pub fn new(index: u64, value: f64) -> Self {
        Self { index, value }
    }
}

/// Turn a plain sequence of values into samples indexed from 0.
pub fn indexed<I>(values: I) -> impl Iterator<Item = Sample>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| Sample::new(i as u64, value))
}

// ── Statistics ──────────────────────────────────────────────────────────

/// Mean and population standard deviation of a full window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub mean: f64,
    pub std_dev: f64,
}

impl WindowStatistics {
    /// Compute from window values in arrival order.
    ///
    /// The mean is accumulated relative to the oldest value, so a window of
    /// identical values yields exactly that value and a σ of exactly 0.
    /// Returns `None` for an empty window.
    pub fn from_values<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a f64>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();
        let shift = *iter.clone().next()?;
        let mut count = 0usize;
        let mut offset_sum = 0.0;
        for v in iter.clone() {
            offset_sum += v - shift;
            count += 1;
        }
        let n = count as f64;
        let mean = shift + offset_sum / n;
        let variance = iter.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// A window whose values are all identical.
    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }

    /// `(mean - k·σ, mean + k·σ)`.
    pub fn bounds(&self, multiplier: f64) -> (f64, f64) {
        let margin = multiplier * self.std_dev;
        (self.mean - margin, self.mean + margin)
    }

    /// `|value - mean| > k·σ`. Never divides, so a degenerate window flags
    /// any value that differs from the mean.
    pub fn is_outlier(&self, value: f64, multiplier: f64) -> bool {
        (value - self.mean).abs() > multiplier * self.std_dev
    }
}

// ── Output ──────────────────────────────────────────────────────────────

/// Verdict for a single ingested sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// The window was not yet full; no verdict.
    Warmup,
    /// Verdict against the W samples preceding this one.
    Classified {
        mean: f64,
        std_dev: f64,
        is_anomaly: bool,
    },
}

impl ClassificationResult {
    pub fn is_anomaly(&self) -> bool {
        matches!(self, ClassificationResult::Classified { is_anomaly: true, .. })
    }

    pub fn is_warmup(&self) -> bool {
        matches!(self, ClassificationResult::Warmup)
    }

    /// Statistics the verdict was made against, if any.
    pub fn statistics(&self) -> Option<WindowStatistics> {
        match *self {
            ClassificationResult::Warmup => None,
            ClassificationResult::Classified { mean, std_dev, .. } => {
                Some(WindowStatistics { mean, std_dev })
            }
        }
    }
}

/// A flagged sample. Accumulates for the lifetime of a detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub index: u64,
    pub value: f64,
}

impl From<Sample> for AnomalyRecord {
    fn from(sample: Sample) -> Self {
        Self {
            index: sample.index,
            value: sample.value,
        }
    }
}

/// A sample together with its verdict, as handed to persistence sinks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSample {
    pub index: u64,
    pub value: f64,
    pub is_anomaly: bool,
    pub result: ClassificationResult,
}

impl ClassifiedSample {
    pub fn new(sample: Sample, result: ClassificationResult) -> Self {
        Self {
            index: sample.index,
            value: sample.value,
            is_anomaly: result.is_anomaly(),
            result,
        }
    }

    pub fn sample(&self) -> Sample {
        Sample::new(self.index, self.value)
    }
}
