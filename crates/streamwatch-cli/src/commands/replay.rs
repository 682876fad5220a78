//! `replay`: classify a recorded stream

use std::path::PathBuf;

use clap::Args;
use streamwatch_detector::{ClassifiedSample, WindowedAnomalyDetector};
use streamwatch_io::{read_samples, SampleSink, TextFileSink};
use tracing::info;

use super::{DetectorArgs, FrameReporter, OutputArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat, RunReport};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded stream, one `index, value` line per sample
    pub input: PathBuf,

    #[command(flatten)]
    pub detector: DetectorArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: ReplayArgs, config: CliConfig, format: OutputFormat) -> CliResult<()> {
    let detector_config = args.detector.resolve(config.detector)?;
    let output = args.output.resolve(&config.output);

    let samples = read_samples(&args.input)?;
    info!(
        input = %args.input.display(),
        samples = samples.len(),
        window = detector_config.window_size,
        "replaying recorded stream"
    );

    let mut detector = WindowedAnomalyDetector::new(detector_config)?;
    let mut sink = TextFileSink::create(&output.dir)?;
    let frames = FrameReporter::new(&output);

    for sample in samples {
        let result = detector.ingest(sample)?;
        sink.record(&ClassifiedSample::new(sample, result))?;
        if frames.is_due(detector.samples_ingested()) {
            frames.frame(&detector.snapshot())?;
        }
    }
    sink.finish()?;

    let snapshot = detector.snapshot();
    frames.write_snapshot(&snapshot)?;

    print_report(
        &RunReport {
            samples: detector.samples_ingested(),
            output_dir: sink.dir().display().to_string(),
            snapshot,
        },
        format,
    )
}
