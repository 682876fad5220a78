//! Detector service: serialises a concurrent feed into one ingest loop.
//!
//! Producers submit samples through a handle; a single spawned task owns
//! the only receive side and calls `ingest` for each sample in turn, so
//! at most one classification is ever in flight. The detector sits behind
//! a mutex that the loop holds for the duration of each `ingest`, which
//! lets readers take consistent snapshots concurrently.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::detector::WindowedAnomalyDetector;
use crate::error::{DetectorError, DetectorResult};
use crate::snapshot::DetectorSnapshot;
use crate::types::{AnomalyRecord, ClassifiedSample, Sample};

/// Default capacity of the sample and result channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Outcome stream produced by the ingest loop, one item per submitted sample.
pub type ResultReceiver = mpsc::Receiver<DetectorResult<ClassifiedSample>>;

/// Owner of a shared detector that can be started as a serial ingest loop.
pub struct DetectorService {
    detector: Arc<Mutex<WindowedAnomalyDetector>>,
    channel_capacity: usize,
}

impl DetectorService {
    pub fn new(detector: WindowedAnomalyDetector) -> Self {
        Self {
            detector: Arc::new(Mutex::new(detector)),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Override the channel capacity (minimum 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Shared reference to the detector, for readers that outlive the handle.
    pub fn detector(&self) -> Arc<Mutex<WindowedAnomalyDetector>> {
        self.detector.clone()
    }

    /// Start the ingest loop on the current tokio runtime.
    ///
    /// Every submitted sample yields exactly one item on the returned
    /// receiver, in submission order. The loop waits for the receiver to
    /// make room, so a consumer that stops reading applies backpressure;
    /// dropping the receiver discards results.
    pub fn spawn(self) -> (DetectorHandle, ResultReceiver) {
        let (sample_tx, mut sample_rx) = mpsc::channel::<Sample>(self.channel_capacity);
        let (result_tx, result_rx) = mpsc::channel(self.channel_capacity);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let detector = self.detector.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    // A closed stop channel only disables this arm; the
                    // loop keeps serving senders cloned from the handle.
                    Some(()) = stop_rx.recv() => {
                        debug!("detector service stopped");
                        break;
                    }
                    sample = sample_rx.recv() => {
                        let Some(sample) = sample else {
                            debug!("sample feed closed");
                            break;
                        };
                        let outcome = Self::ingest_locked(&detector, sample);
                        let poisoned = matches!(outcome, Err(DetectorError::LockPoisoned));
                        if let Err(ref e) = outcome {
                            warn!(index = sample.index, error = %e, "sample rejected");
                        }
                        if result_tx.send(outcome).await.is_err() {
                            debug!(index = sample.index, "result receiver dropped");
                        }
                        if poisoned {
                            break;
                        }
                    }
                }
            }
        });

        let handle = DetectorHandle {
            samples: sample_tx,
            stop: stop_tx,
            detector: self.detector,
            task,
        };
        (handle, result_rx)
    }

    fn ingest_locked(
        detector: &Mutex<WindowedAnomalyDetector>,
        sample: Sample,
    ) -> DetectorResult<ClassifiedSample> {
        let mut guard = detector.lock().map_err(|_| DetectorError::LockPoisoned)?;
        let result = guard.ingest(sample)?;
        Ok(ClassifiedSample::new(sample, result))
    }
}

/// Handle to a running ingest loop.
pub struct DetectorHandle {
    samples: mpsc::Sender<Sample>,
    stop: mpsc::Sender<()>,
    detector: Arc<Mutex<WindowedAnomalyDetector>>,
    task: JoinHandle<()>,
}

impl DetectorHandle {
    /// Queue a sample for classification.
    pub async fn submit(&self, sample: Sample) -> DetectorResult<()> {
        self.samples
            .send(sample)
            .await
            .map_err(|_| DetectorError::ServiceStopped)
    }

    /// A sender for additional producer tasks.
    pub fn sender(&self) -> mpsc::Sender<Sample> {
        self.samples.clone()
    }

    /// Anomalies flagged so far, read under the ingest lock.
    pub fn anomalies(&self) -> DetectorResult<Vec<AnomalyRecord>> {
        let guard = self
            .detector
            .lock()
            .map_err(|_| DetectorError::LockPoisoned)?;
        Ok(guard.anomalies())
    }

    /// Consistent display snapshot, read under the ingest lock.
    pub fn snapshot(&self) -> DetectorResult<DetectorSnapshot> {
        let guard = self
            .detector
            .lock()
            .map_err(|_| DetectorError::LockPoisoned)?;
        Ok(guard.snapshot())
    }

    /// Stop at the next sample boundary. Queued samples are not processed.
    pub async fn stop(self) -> DetectorResult<()> {
        // The loop may already have exited; that is fine.
        let _ = self.stop.send(()).await;
        self.task.await.map_err(|e| {
            warn!(error = %e, "detector service task failed");
            DetectorError::ServiceStopped
        })
    }

    /// Close the feed and wait until every queued sample is processed.
    ///
    /// Other senders obtained from [`sender`](Self::sender) must be dropped
    /// for this to return.
    pub async fn finish(self) -> DetectorResult<()> {
        let DetectorHandle {
            samples,
            stop,
            task,
            ..
        } = self;
        drop(samples);
        let joined = task.await;
        drop(stop);
        joined.map_err(|e| {
            warn!(error = %e, "detector service task failed");
            DetectorError::ServiceStopped
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{indexed, ClassificationResult};

    fn service(w: usize) -> DetectorService {
        DetectorService::new(WindowedAnomalyDetector::configure(w, 3.0).unwrap())
    }

    #[tokio::test]
    async fn results_arrive_in_order() {
        let (handle, mut results) = service(3).spawn();

        for sample in indexed(vec![10.0, 10.0, 10.0, 10.0, 100.0]) {
            handle.submit(sample).await.unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(results.recv().await.unwrap().unwrap());
        }
        assert_eq!(
            seen.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert!(seen[..3].iter().all(|c| c.result == ClassificationResult::Warmup));
        assert!(!seen[3].is_anomaly);
        assert!(seen[4].is_anomaly);

        let anomalies = handle.anomalies().unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 4);

        handle.finish().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_sample_is_reported() {
        let (handle, mut results) = service(2).spawn();

        handle.submit(Sample::new(0, 1.0)).await.unwrap();
        handle.submit(Sample::new(5, 1.0)).await.unwrap();
        handle.submit(Sample::new(1, 1.0)).await.unwrap();

        assert!(results.recv().await.unwrap().is_ok());
        assert_eq!(
            results.recv().await.unwrap().unwrap_err(),
            DetectorError::OutOfOrderSample {
                expected: 1,
                received: 5,
            }
        );
        assert_eq!(results.recv().await.unwrap().unwrap().index, 1);

        handle.finish().await.unwrap();
    }

    #[tokio::test]
    async fn finish_drains_queue() {
        let svc = service(4);
        let shared = svc.detector();
        let (handle, results) = svc.spawn();
        drop(results);

        for sample in indexed((0..100).map(|i| (i % 7) as f64)) {
            handle.submit(sample).await.unwrap();
        }
        handle.finish().await.unwrap();

        let detector = shared.lock().unwrap();
        assert_eq!(detector.samples_ingested(), 100);
        assert_eq!(detector.window_values().len(), 4);
    }

    #[tokio::test]
    async fn concurrent_producers_serialise() {
        let svc = service(5);
        let shared = svc.detector();
        let (handle, mut results) = svc.spawn();
        let tx = handle.sender();

        // One producer owns the indices, the main task only reads snapshots.
        let producer = tokio::spawn(async move {
            for sample in indexed((0..50).map(|i| i as f64)) {
                tx.send(sample).await.unwrap();
            }
        });

        let mut received = 0;
        while received < 50 {
            let outcome = results.recv().await.unwrap();
            assert!(outcome.is_ok());
            let snap = handle.snapshot().unwrap();
            assert!(snap.window_len <= 5);
            received += 1;
        }
        producer.await.unwrap();
        handle.finish().await.unwrap();

        assert_eq!(shared.lock().unwrap().samples_ingested(), 50);
    }

    #[tokio::test]
    async fn dropped_handle_keeps_serving_senders() {
        let svc = service(3);
        let shared = svc.detector();
        let (handle, mut results) = svc.spawn();
        let tx = handle.sender();

        for sample in indexed((0..5).map(|i| i as f64)) {
            tx.send(sample).await.unwrap();
        }
        drop(handle);
        for i in 5..10u64 {
            tx.send(Sample::new(i, i as f64)).await.unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(outcome) = results.recv().await {
            seen.push(outcome.unwrap().index);
        }
        assert_eq!(seen, (0..10).collect::<Vec<u64>>());
        assert_eq!(shared.lock().unwrap().samples_ingested(), 10);
    }

    #[tokio::test]
    async fn submit_after_stop_fails() {
        let svc = service(2);
        let (handle, _results) = svc.spawn();
        let tx = handle.sender();
        handle.stop().await.unwrap();

        assert!(tx.send(Sample::new(0, 1.0)).await.is_err());
    }
}
