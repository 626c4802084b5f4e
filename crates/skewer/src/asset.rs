//! # Asset sources
//!
//! The storage boundary the pipeline reads manifests and images through. An
//! [`AssetSource`] resolves a `/`-delimited resource path either to a buffered
//! async reader (manifests are streamed line by line) or to its full contents
//! (images are decoded in one go).
//!
//! Two sources ship with the crate:
//!
//! - [`FsAssets`] serves files below a root directory using `tokio::fs`
//! - [`MemoryAssets`] serves byte buffers registered up front

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, BufReader};

use crate::error::{Error, Result};

/// Buffered reader handed out by [`AssetSource::open`].
pub type AssetReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Provides raw bytes for a resource path.
///
/// Implementations must report a missing resource as
/// [`Error::ResourceNotFound`] so callers can tell it apart from other I/O
/// failures.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Open `path` for streaming reads.
    async fn open(&self, path: &str) -> Result<AssetReader>;

    /// Read the whole of `path` into memory.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<A> AssetSource for Arc<A>
where
    A: AssetSource + ?Sized,
{
    async fn open(&self, path: &str) -> Result<AssetReader> {
        (**self).open(path).await
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read(path).await
    }
}

/// Serves resources from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl AssetSource for FsAssets {
    async fn open(&self, path: &str) -> Result<AssetReader> {
        let file = tokio::fs::File::open(self.locate(path))
            .await
            .map_err(|e| Error::from_io(path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(self.locate(path))
            .await
            .map_err(|e| Error::from_io(path, e))
    }
}

/// Serves resources from memory.
///
/// Buffers are reference counted, so opening the same resource many times
/// does not copy it.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`, replacing any previous contents.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), Arc::from(bytes.into()));
    }

    /// Builder flavour of [`MemoryAssets::insert`].
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn lookup(&self, path: &str) -> Result<Arc<[u8]>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound { path: path.to_string() })
    }
}

#[async_trait]
impl AssetSource for MemoryAssets {
    async fn open(&self, path: &str) -> Result<AssetReader> {
        let bytes = self.lookup(path)?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.lookup(path)?.to_vec())
    }
}
