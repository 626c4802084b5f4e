//! # Manifest reading
//!
//! A manifest is a text resource listing one sample path per line. The reader
//! streams it lazily and pairs every line with its 0-based position.

use std::future::Future;

use futures::Stream;
use log::debug;
use tokio::io::{AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::asset::{AssetReader, AssetSource};
use crate::error::{Error, Result};
use crate::runtime::CancelToken;

/// One line of a manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 0-based line number
    pub index: usize,
    /// The line as written, without its terminator
    pub path: String,
}

/// Lazily reads the entries of one manifest.
pub struct ManifestReader {
    name: String,
    lines: Lines<AssetReader>,
    next_index: usize,
}

impl ManifestReader {
    /// Open `name` through `assets`.
    ///
    /// Fails with [`Error::ResourceNotFound`] if the manifest does not exist,
    /// in which case no entry is ever produced.
    pub async fn open<A>(assets: &A, name: &str) -> Result<Self>
    where
        A: AssetSource + ?Sized,
    {
        let reader = assets.open(name).await?;
        Ok(Self {
            name: name.to_string(),
            lines: reader.lines(),
            next_index: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next entry, or `None` once the manifest is exhausted.
    pub async fn next_entry(&mut self) -> Result<Option<ManifestEntry>> {
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|source| Error::Io { path: self.name.clone(), source })?;

        Ok(line.map(|line| {
            let index = self.next_index;
            self.next_index += 1;
            let path = match line.strip_suffix('\r') {
                Some(stripped) => stripped.to_string(),
                None => line,
            };
            ManifestEntry { index, path }
        }))
    }

    /// All remaining entries as a stream.
    pub fn entries(self) -> impl Stream<Item = Result<ManifestEntry>> {
        futures::stream::try_unfold(self, |mut reader| async move {
            Ok::<_, Error>(reader.next_entry().await?.map(|entry| (entry, reader)))
        })
    }

    /// Run `handler` on every entry in order, awaiting each before reading
    /// the next. Returns the number of entries read.
    pub async fn for_each_entry<F, Fut>(mut self, mut handler: F) -> Result<usize>
    where
        F: FnMut(ManifestEntry) -> Fut,
        Fut: Future<Output = ()>,
    {
        while let Some(entry) = self.next_entry().await? {
            handler(entry).await;
        }
        Ok(self.next_index)
    }

    /// Read the manifest on a background task, pushing entries into `queue`.
    ///
    /// The task resolves to the number of entries read once the manifest is
    /// exhausted, independently of when the entries are consumed. It stops
    /// early if `cancel` fires or every receiver is gone.
    pub fn spawn_feed(
        mut self,
        queue: mpsc::Sender<ManifestEntry>,
        cancel: CancelToken,
    ) -> JoinHandle<Result<usize>> {
        tokio::spawn(async move {
            while !cancel.is_cancelled() {
                let Some(entry) = self.next_entry().await? else {
                    break;
                };
                if queue.send(entry).await.is_err() {
                    debug!("manifest '{}': consumers went away, stopping read", self.name);
                    break;
                }
            }
            debug!("manifest '{}': {} entries read", self.name, self.next_index);
            Ok::<_, Error>(self.next_index)
        })
    }
}
