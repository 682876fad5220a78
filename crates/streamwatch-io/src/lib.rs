//! # streamwatch-io
//!
//! Persistence collaborators for the detector. Nothing here takes part in
//! detection; everything consumes the detector's public output.
//!
//! - [`SampleSink`]: per-sample consumer (`TextFileSink`, `InMemorySink`)
//! - [`JsonSnapshotFile`]: atomic JSON file of the latest display snapshot
//! - [`read_samples`]: load a recorded `index, value` stream for replay

#![deny(unsafe_code)]

pub mod error;
pub mod reader;
pub mod sink;
pub mod snapshot_file;

pub use error::{IoError, IoResult};
pub use reader::{parse_sample_line, read_samples, read_samples_from};
pub use sink::{
    format_sample_line, InMemorySink, SampleSink, TextFileSink, ANOMALIES_FILE_NAME,
    INPUT_FILE_NAME, OUTPUT_FILE_NAME,
};
pub use snapshot_file::JsonSnapshotFile;
