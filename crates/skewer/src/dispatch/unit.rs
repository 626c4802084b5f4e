use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::asset::AssetSource;
use crate::config::DispatcherConfig;
use crate::error::{Error, Result};
use crate::label::label_for_line;
use crate::manifest::ManifestEntry;
use crate::normalize::ImageNormalizer;
use crate::port::IngestionPort;
use crate::runtime::CancelToken;
use crate::sample::{Sample, SampleState, Split};
use super::report::Outcome;

/// Everything a unit of work needs, shared by all workers of one load.
pub(crate) struct UnitContext<A, P, const SIDE: usize> {
    pub(crate) load_id: Uuid,
    pub(crate) split: Split,
    pub(crate) assets: Arc<A>,
    pub(crate) port: Arc<P>,
    pub(crate) config: Arc<DispatcherConfig>,
    pub(crate) normalizer: ImageNormalizer<SIDE>,
    /// Units that reached a terminal state so far
    pub(crate) processed: Arc<AtomicUsize>,
}

/// Follows one entry through its [`SampleState`]s.
struct Tracker {
    load_id: Uuid,
    index: usize,
    state: SampleState,
}

impl Tracker {
    fn new(load_id: Uuid, index: usize) -> Self {
        Self {
            load_id,
            index,
            state: SampleState::Pending,
        }
    }

    fn enter(&mut self, next: SampleState) {
        match self.state.advance(next) {
            Some(state) => {
                debug!("load {}: sample {} {:?} -> {:?}", self.load_id, self.index, self.state, state);
                self.state = state;
            }
            None => {
                debug_assert!(false, "illegal transition {:?} -> {:?}", self.state, next);
                warn!("load {}: sample {} ignored transition {:?} -> {:?}", self.load_id, self.index, self.state, next);
            }
        }
    }
}

impl<A, P, const SIDE: usize> UnitContext<A, P, SIDE>
where
    A: AssetSource + 'static,
    P: IngestionPort + 'static,
{
    /// Take one entry from decode to acknowledgement.
    pub(crate) async fn run(&self, entry: ManifestEntry, cancel: &CancelToken) -> Outcome {
        let index = entry.index;
        let mut tracker = Tracker::new(self.load_id, index);

        let result = if cancel.is_cancelled() {
            Err(Error::Cancelled { index })
        } else {
            self.process(entry, &mut tracker, cancel).await
        };

        let outcome = Outcome::from(result);
        tracker.enter(outcome.state());
        match &outcome {
            Outcome::Acknowledged => {}
            Outcome::Failed(e) => error!("load {}: sample {} failed: {}", self.load_id, index, e),
            Outcome::Dropped(e) => warn!("load {}: sample {} dropped: {}", self.load_id, index, e),
        }

        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if is_progress_point(index, self.config.progress_interval) {
            info!("load {}: {}th {} image loaded ({} processed)", self.load_id, index, self.split, processed);
        }
        outcome
    }

    async fn process(&self, entry: ManifestEntry, tracker: &mut Tracker, cancel: &CancelToken) -> Result<()> {
        let index = entry.index;
        let path = self.config.resolve(&entry.path);

        let bytes = self.assets.read(&path).await?;
        let normalizer = self.normalizer;
        let decoded = tokio::task::spawn_blocking({
            let path = path.clone();
            move || normalizer.decode(&path, &bytes)
        })
        .await
        .map_err(|e| Error::Worker(e.to_string()))??;
        tracker.enter(SampleState::Decoded);

        let label = label_for_line(&entry.path)?;
        tracker.enter(SampleState::Labeled);

        let pixels = self.normalizer.normalize_image(&decoded)?;
        tracker.enter(SampleState::Normalized);

        let sample = Sample::new(pixels, label, self.split.is_training());
        tracker.enter(SampleState::Submitted);
        self.submit(index, sample, cancel).await
    }

    /// Submit with bounded retries on transient port failures.
    async fn submit(&self, index: usize, sample: Sample, cancel: &CancelToken) -> Result<()> {
        let attempts = self.config.max_submit_attempts;
        let mut attempt = 1;
        let mut sample = sample;

        loop {
            let retry_copy = (attempt < attempts).then(|| sample.clone());
            let result = self.submit_once(index, sample, cancel).await;

            match (result, retry_copy) {
                (Err(Error::Submission { source, .. }), Some(copy)) if source.is_transient() => {
                    warn!(
                        "load {}: sample {} attempt {}/{} failed ({}), retrying",
                        self.load_id, index, attempt, attempts, source
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Error::Cancelled { index }),
                        _ = tokio::time::sleep(self.config.retry_backoff) => {}
                    }
                    sample = copy;
                    attempt += 1;
                }
                (result, _) => return result,
            }
        }
    }

    async fn submit_once(&self, index: usize, sample: Sample, cancel: &CancelToken) -> Result<()> {
        let ack = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled { index }),
            ack = self.port.submit(sample) => ack,
        };

        let timeout = self.config.submit_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled { index }),
            waited = tokio::time::timeout(timeout, ack) => match waited {
                Err(_) => Err(Error::SubmitTimeout { index, timeout }),
                Ok(Err(_)) => Err(Error::Interrupted { index }),
                Ok(Ok(Err(source))) => Err(Error::Submission { index, source }),
                Ok(Ok(Ok(()))) => Ok(()),
            },
        }
    }
}

/// Whether finishing entry `index` logs a progress line: the last entry of
/// every block of `interval`.
pub(crate) fn is_progress_point(index: usize, interval: usize) -> bool {
    interval > 0 && index % interval == interval - 1
}

/// Pull entries off the shared queue until it closes, running each to a
/// terminal state.
pub(crate) async fn worker_loop<A, P, const SIDE: usize>(
    unit: Arc<UnitContext<A, P, SIDE>>,
    queue: Arc<Mutex<mpsc::Receiver<ManifestEntry>>>,
    cancel: CancelToken,
) -> Vec<(usize, Outcome)>
where
    A: AssetSource + 'static,
    P: IngestionPort + 'static,
{
    let mut outcomes = Vec::new();
    loop {
        let next = {
            let mut queue = queue.lock().await;
            queue.recv().await
        };
        let Some(entry) = next else {
            break;
        };
        let index = entry.index;
        let outcome = unit.run(entry, &cancel).await;
        outcomes.push((index, outcome));
    }
    outcomes
}
