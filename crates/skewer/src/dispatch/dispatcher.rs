use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use futures::TryStreamExt;
use log::info;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::asset::AssetSource;
use crate::config::DispatcherConfig;
use crate::constant::IMAGE_SIZE;
use crate::error::Result;
use crate::manifest::ManifestReader;
use crate::normalize::ImageNormalizer;
use crate::port::IngestionPort;
use crate::runtime::CancelToken;
use crate::sample::Split;
use super::load::ManifestLoad;
use super::report::LoadReport;
use super::unit::{UnitContext, worker_loop};

/// Drives manifests through a fixed pool of workers into an ingestion port.
///
/// Each manifest line becomes one unit of work: read the image, decode it,
/// derive its label, normalize it to `SIDE x SIDE x 3` floats and submit it.
/// At most `config.workers` units are in flight per load; a failing unit never
/// affects its siblings.
pub struct Dispatcher<A, P, const SIDE: usize = IMAGE_SIZE> {
    assets: Arc<A>,
    port: Arc<P>,
    config: Arc<DispatcherConfig>,
    normalizer: ImageNormalizer<SIDE>,
}

impl<A, P, const SIDE: usize> Clone for Dispatcher<A, P, SIDE> {
    fn clone(&self) -> Self {
        Self {
            assets: self.assets.clone(),
            port: self.port.clone(),
            config: self.config.clone(),
            normalizer: self.normalizer,
        }
    }
}

impl<A, P, const SIDE: usize> Dispatcher<A, P, SIDE>
where
    A: AssetSource + 'static,
    P: IngestionPort + 'static,
{
    pub fn new(assets: A, port: P, config: DispatcherConfig) -> Result<Self> {
        Self::from_shared(Arc::new(assets), Arc::new(port), config)
    }

    /// Build from already shared sources, e.g. to keep a handle on the port.
    pub fn from_shared(assets: Arc<A>, port: Arc<P>, config: DispatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            assets,
            port,
            config: Arc::new(config),
            normalizer: ImageNormalizer::new(),
        })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    fn unit_context(&self, load_id: Uuid, split: Split) -> UnitContext<A, P, SIDE> {
        UnitContext {
            load_id,
            split,
            assets: self.assets.clone(),
            port: self.port.clone(),
            config: self.config.clone(),
            normalizer: self.normalizer,
            processed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Open `manifest` and start loading it in the background.
    ///
    /// Fails up front with [`ResourceNotFound`](crate::Error::ResourceNotFound) when the manifest does
    /// not exist; no unit is started in that case.
    pub async fn spawn_load(&self, manifest: &str, split: Split, cancel: CancelToken) -> Result<ManifestLoad> {
        let reader = ManifestReader::open(self.assets.as_ref(), manifest).await?;
        let load_id = Uuid::new_v4();
        info!(
            "load {}: reading {} manifest '{}' with {} worker(s)",
            load_id, split, manifest, self.config.workers
        );

        let (tx, rx) = mpsc::channel(self.config.queue_capacity);
        let queue = Arc::new(Mutex::new(rx));
        let unit = Arc::new(self.unit_context(load_id, split));
        let processed = unit.processed.clone();

        let reader = reader.spawn_feed(tx, cancel.clone());
        let workers = (0..self.config.workers)
            .map(|_| tokio::spawn(worker_loop(unit.clone(), queue.clone(), cancel.clone())))
            .collect();

        Ok(ManifestLoad::new(
            load_id,
            manifest.to_string(),
            split,
            reader,
            workers,
            processed,
            cancel,
        ))
    }

    /// Load `manifest` and wait until every entry reached a terminal state.
    pub async fn load(&self, manifest: &str, split: Split) -> Result<LoadReport> {
        self.spawn_load(manifest, split, CancelToken::new()).await?.finish().await
    }

    /// Load `manifest` one entry at a time, submitting in manifest order.
    pub async fn load_ordered(&self, manifest: &str, split: Split, cancel: CancelToken) -> Result<LoadReport> {
        let reader = ManifestReader::open(self.assets.as_ref(), manifest).await?;
        let load_id = Uuid::new_v4();
        info!("load {}: reading {} manifest '{}' in order", load_id, split, manifest);

        let unit = self.unit_context(load_id, split);
        let mut report = LoadReport::new(load_id, manifest, split);
        let entries = reader.entries();
        futures::pin_mut!(entries);
        while let Some(entry) = entries.try_next().await? {
            let index = entry.index;
            report.lines_read += 1;
            let outcome = unit.run(entry, &cancel).await;
            report.record(index, outcome);
        }
        Ok(report.seal())
    }
}

impl<A, P, const SIDE: usize> std::fmt::Debug for Dispatcher<A, P, SIDE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("side", &SIDE)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
