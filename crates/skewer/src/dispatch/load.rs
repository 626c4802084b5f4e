use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;
use log::error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::runtime::CancelToken;
use crate::sample::Split;
use super::report::{LoadReport, Outcome};

/// Handle to a manifest load running in the background.
///
/// Reading the manifest and processing its entries finish separately:
/// [`ManifestLoad::read_complete`] resolves once every line has been read,
/// [`ManifestLoad::finish`] once every unit of work has reached a terminal
/// state. Dropping the handle before `finish` cancels the load.
pub struct ManifestLoad {
    id: Uuid,
    manifest: String,
    split: Split,
    reader: Option<JoinHandle<Result<usize>>>,
    lines_read: Option<usize>,
    workers: Vec<JoinHandle<Vec<(usize, Outcome)>>>,
    processed: Arc<AtomicUsize>,
    cancel: CancelToken,
}

impl ManifestLoad {
    pub(crate) fn new(
        id: Uuid,
        manifest: String,
        split: Split,
        reader: JoinHandle<Result<usize>>,
        workers: Vec<JoinHandle<Vec<(usize, Outcome)>>>,
        processed: Arc<AtomicUsize>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            id,
            manifest,
            split,
            reader: Some(reader),
            lines_read: None,
            workers,
            processed,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// Units that have reached a terminal state so far.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Stop dequeuing entries and interrupt in-flight submissions. Every entry
    /// not yet acknowledged is reported as dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait until the manifest has been read to the end and return the number
    /// of lines read. Units may still be running afterwards.
    ///
    /// A read error is returned once; later calls report the reader as gone.
    pub async fn read_complete(&mut self) -> Result<usize> {
        if let Some(lines) = self.lines_read {
            return Ok(lines);
        }
        let reader = self
            .reader
            .take()
            .ok_or_else(|| Error::Worker("manifest reader already failed".into()))?;
        let lines = reader.await.map_err(|e| Error::Worker(e.to_string()))??;
        self.lines_read = Some(lines);
        Ok(lines)
    }

    /// Wait for the read and every unit, then summarize.
    ///
    /// Units are always joined, even when the read failed part way, so no
    /// work outlives this call. If the read failed or a worker died, the
    /// outcomes collected so far travel in [`Error::PartialLoad`].
    pub async fn finish(mut self) -> Result<LoadReport> {
        let read = self.read_complete().await;
        let workers = std::mem::take(&mut self.workers);

        let mut report = LoadReport::new(self.id, self.manifest.clone(), self.split);
        let mut worker_failure = None;
        for joined in join_all(workers).await {
            match joined {
                Ok(outcomes) => {
                    for (index, outcome) in outcomes {
                        report.record(index, outcome);
                    }
                }
                Err(e) => {
                    error!("load {}: worker died: {}", self.id, e);
                    if worker_failure.is_none() {
                        worker_failure = Some(Error::Worker(e.to_string()));
                    }
                }
            }
        }

        let failure = match read {
            Ok(lines) => {
                report.lines_read = lines;
                worker_failure
            }
            Err(e) => {
                // every line read before the failure was handed to a unit
                report.lines_read = report.processed();
                Some(e)
            }
        };

        let report = report.seal();
        match failure {
            None => Ok(report),
            Some(source) => Err(Error::PartialLoad {
                report: Box::new(report),
                source: Box::new(source),
            }),
        }
    }
}

impl Drop for ManifestLoad {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::asset::MemoryAssets;
    use crate::config::DispatcherConfig;
    use crate::dispatch::Dispatcher;
    use crate::error::Error;
    use crate::normalize::test_images::uniform_png;
    use crate::port::{Acknowledgement, IngestionPort};
    use crate::runtime::CancelToken;
    use crate::sample::{Sample, Split};

    /// Acknowledges everything except the label `boom`, on which it panics.
    struct TrippingPort;

    #[async_trait]
    impl IngestionPort for TrippingPort {
        async fn submit(&self, sample: Sample) -> Acknowledgement {
            if sample.label == "boom" {
                panic!("port tripped");
            }
            Acknowledgement::ready(Ok(()))
        }
    }

    fn image() -> Vec<u8> {
        uniform_png(2, 2, [9, 9, 9])
    }

    fn dispatcher(assets: MemoryAssets, workers: usize) -> Dispatcher<MemoryAssets, TrippingPort, 2> {
        Dispatcher::new(assets, TrippingPort, DispatcherConfig::default().with_workers(workers)).unwrap()
    }

    #[tokio::test]
    async fn test_broken_manifest_keeps_finished_outcomes() {
        let mut manifest = b"a/one/1.png\n".to_vec();
        manifest.extend_from_slice(&[0xff, 0xfe, b'\n']);
        manifest.extend_from_slice(b"a/two/2.png\n");
        let assets = MemoryAssets::new()
            .with("data/m.txt", manifest)
            .with("data/a/one/1.png", image())
            .with("data/a/two/2.png", image());

        let err = dispatcher(assets, 2)
            .spawn_load("data/m.txt", Split::Train, CancelToken::new())
            .await
            .unwrap()
            .finish()
            .await
            .unwrap_err();

        let Error::PartialLoad { ref report, ref source } = err else {
            panic!("expected a partial load, got {err:?}");
        };
        assert!(matches!(**source, Error::Io { .. }));
        assert_eq!(report.acknowledged, vec![0]);
        assert_eq!(report.lines_read, 1);
        assert!(err.partial_report().is_some());
    }

    #[tokio::test]
    async fn test_dead_worker_keeps_sibling_outcomes() {
        let assets = MemoryAssets::new()
            .with("data/m.txt", "a/boom/0.png\na/ok/1.png\na/ok/2.png\na/ok/3.png\n")
            .with("data/a/boom/0.png", image())
            .with("data/a/ok/1.png", image())
            .with("data/a/ok/2.png", image())
            .with("data/a/ok/3.png", image());

        let err = dispatcher(assets, 2)
            .spawn_load("data/m.txt", Split::Train, CancelToken::new())
            .await
            .unwrap()
            .finish()
            .await
            .unwrap_err();

        let report = err.partial_report().expect("partial report");
        assert!(matches!(err, Error::PartialLoad { ref source, .. } if matches!(**source, Error::Worker(_))));
        assert_eq!(report.lines_read, 4);
        assert_eq!(report.acknowledged, vec![1, 2, 3]);
    }
}
