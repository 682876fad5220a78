//! `simulate`: stream a synthetic signal through the detector service

use std::sync::Mutex;

use clap::Args;
use streamwatch_detector::{
    DetectorError, DetectorService, DetectorSnapshot, Sample, WindowedAnomalyDetector,
    DEFAULT_CHANNEL_CAPACITY,
};
use streamwatch_io::{SampleSink, TextFileSink};
use streamwatch_simulation::SeasonalNoiseSource;
use tracing::{debug, info};

use super::{DetectorArgs, FrameReporter, OutputArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_report, OutputFormat, RunReport};

#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub detector: DetectorArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Number of samples to generate
    #[arg(short, long)]
    pub length: Option<u64>,

    /// RNG seed for a reproducible stream
    #[arg(short, long, env = "STREAMWATCH_SEED")]
    pub seed: Option<u64>,
}

fn snapshot_of(detector: &Mutex<WindowedAnomalyDetector>) -> CliResult<DetectorSnapshot> {
    let guard = detector.lock().map_err(|_| DetectorError::LockPoisoned)?;
    Ok(guard.snapshot())
}

/// Push `samples` through a detector service, recording every verdict in
/// `sink` and calling `on_frame` whenever `frames` says a frame is due.
///
/// Samples are submitted in batches that end on frame boundaries, and each
/// batch is drained before the next is submitted, so a frame snapshot shows
/// the detector exactly after the sample it is labelled with.
pub(crate) async fn stream_through_service<I, S, F>(
    samples: I,
    detector: WindowedAnomalyDetector,
    sink: &mut S,
    frames: &FrameReporter,
    mut on_frame: F,
) -> CliResult<DetectorSnapshot>
where
    I: IntoIterator<Item = Sample>,
    S: SampleSink,
    F: FnMut(&DetectorSnapshot) -> CliResult<()>,
{
    let service = DetectorService::new(detector);
    let shared = service.detector();
    let (handle, mut results) = service.spawn();

    let mut samples = samples.into_iter().peekable();
    let mut processed = 0u64;

    while samples.peek().is_some() {
        let boundary = frames.next_boundary(processed, DEFAULT_CHANNEL_CAPACITY as u64);
        let mut submitted = 0u64;
        for sample in samples.by_ref().take((boundary - processed) as usize) {
            handle.submit(sample).await?;
            submitted += 1;
        }

        for _ in 0..submitted {
            let classified = results.recv().await.ok_or(DetectorError::ServiceStopped)??;
            sink.record(&classified)?;
            processed += 1;
        }

        if frames.is_due(processed) {
            on_frame(&snapshot_of(&shared)?)?;
        }
    }
    handle.finish().await?;

    let snapshot = snapshot_of(&shared)?;
    debug!(processed, anomalies = snapshot.anomaly_count(), "stream complete");
    Ok(snapshot)
}

pub async fn execute(args: SimulateArgs, config: CliConfig, format: OutputFormat) -> CliResult<()> {
    let detector_config = args.detector.resolve(config.detector)?;
    let output = args.output.resolve(&config.output);

    let mut simulation = config.simulation;
    if let Some(length) = args.length {
        simulation.length = length;
    }
    if let Some(seed) = args.seed {
        simulation.seed = Some(seed);
    }
    let source = SeasonalNoiseSource::new(simulation)?;

    info!(
        window = detector_config.window_size,
        multiplier = detector_config.threshold_multiplier,
        length = source.config().length,
        "starting simulation"
    );

    let mut sink = TextFileSink::create(&output.dir)?;
    let frames = FrameReporter::new(&output);

    let snapshot = stream_through_service(
        source,
        WindowedAnomalyDetector::new(detector_config)?,
        &mut sink,
        &frames,
        |snapshot| frames.frame(snapshot),
    )
    .await?;
    sink.finish()?;
    frames.write_snapshot(&snapshot)?;

    print_report(
        &RunReport {
            samples: snapshot.samples_ingested,
            output_dir: sink.dir().display().to_string(),
            snapshot,
        },
        format,
    )
}
