//! Reader for recorded streams in the `index, value` text layout.
//!
//! Accepts both the raw and the annotated layout: a trailing `*` marker
//! is ignored, blank lines are skipped. Indices are taken from the file
//! as written; ordering is enforced later by the detector.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use streamwatch_detector::Sample;

use crate::error::{IoError, IoResult};

/// Parse one non-blank line. `line_no` is 1-based, for error messages.
pub fn parse_sample_line(line: &str, line_no: usize) -> IoResult<Sample> {
    let malformed = |reason: String| IoError::MalformedLine {
        line: line_no,
        reason,
    };

    let body = line.trim().trim_end_matches('*').trim_end();
    let (index, value) = body
        .split_once(',')
        .ok_or_else(|| malformed("expected `index, value`".to_string()))?;

    let index: u64 = index
        .trim()
        .parse()
        .map_err(|e| malformed(format!("bad index {:?}: {}", index.trim(), e)))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| malformed(format!("bad value {:?}: {}", value.trim(), e)))?;

    Ok(Sample::new(index, value))
}

/// Read every sample from a reader.
pub fn read_samples_from<R: Read>(reader: R) -> IoResult<Vec<Sample>> {
    let mut samples = Vec::new();
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_sample_line(&line, i + 1)?);
    }
    Ok(samples)
}

/// Read every sample from a file.
///
/// Files written by [`TextFileSink`](crate::TextFileSink) hold values rounded
/// to four decimals, so replaying one reproduces the live verdicts only
/// where no sample sits within that rounding of its threshold.
pub fn read_samples(path: impl AsRef<Path>) -> IoResult<Vec<Sample>> {
    read_samples_from(File::open(path)?)
}
