use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::dispatch::LoadReport;
use crate::port::PortError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while ingesting a manifest.
///
/// Unit-level errors (everything except a manifest failing to open, a bad
/// configuration, or an invalid device) only ever abort the unit of work that
/// produced them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("resource '{path}' not found")]
    ResourceNotFound { path: String },
    #[error("failed reading resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("path '{path}' has {segments} segment(s), expected at least 3 (<root>/<category>/<label>)")]
    MalformedPath { path: String, segments: usize },
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image is {width}x{height}, expected {side}x{side}")]
    UnexpectedDimensions { width: u32, height: u32, side: usize },
    #[error("failed to add sample {index} to model: {source}")]
    Submission {
        index: usize,
        #[source]
        source: PortError,
    },
    #[error("sample {index} was not acknowledged within {timeout:?}")]
    SubmitTimeout { index: usize, timeout: Duration },
    #[error("wait for sample {index} was interrupted before the port answered")]
    Interrupted { index: usize },
    #[error("load cancelled before sample {index} completed")]
    Cancelled { index: usize },
    #[error("device id {device} is outside 1..={partitions}")]
    InvalidDevice { device: usize, partitions: usize },
    #[error(
        "load of '{}' stopped after {} line(s), {} acknowledged: {source}",
        .report.manifest,
        .report.lines_read,
        .report.acknowledged.len()
    )]
    PartialLoad {
        /// Outcomes of every unit that did finish
        report: Box<LoadReport>,
        #[source]
        source: Box<Error>,
    },
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("tensor conversion failed: {0}")]
    Tensor(String),
}

impl Error {
    /// Whether this error means the sample was dropped rather than rejected.
    ///
    /// Drops come from interruption or cancellation; the caller may retry them
    /// or count them, but they are never reported as failures of the sample.
    pub fn is_drop(&self) -> bool {
        matches!(self, Error::Interrupted { .. } | Error::Cancelled { .. })
    }

    /// The outcomes gathered before a load broke off, if this is a
    /// [`Error::PartialLoad`].
    pub fn partial_report(&self) -> Option<&LoadReport> {
        match self {
            Error::PartialLoad { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Build the error for an I/O failure on `path`, folding `NotFound` into
    /// [`Error::ResourceNotFound`].
    pub(crate) fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::ResourceNotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}
