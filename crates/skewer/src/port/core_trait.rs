use std::fmt;

use async_trait::async_trait;

use crate::sample::Sample;
use super::acknowledgement::Acknowledgement;

/// The boundary to the model-training component.
///
/// `submit` hands over a sample and returns an [`Acknowledgement`] that
/// resolves once the sample has been accepted or rejected. Implementations are
/// shared by every worker of a load and so must tolerate concurrent calls,
/// either natively or by serializing them (see [`SerialPort`](super::SerialPort)).
///
/// # Example
///
/// ```ignore
/// use skewer::port::{Acknowledgement, IngestionPort};
/// use async_trait::async_trait;
///
/// struct Discard;
///
/// #[async_trait]
/// impl IngestionPort for Discard {
///     async fn submit(&self, _sample: Sample) -> Acknowledgement {
///         Acknowledgement::ready(Ok(()))
///     }
/// }
/// ```
#[async_trait]
pub trait IngestionPort: Send + Sync {
    /// Submit one sample for ingestion.
    ///
    /// Dropping the acknowledgement's sender without answering interrupts the
    /// submitter's wait.
    async fn submit(&self, sample: Sample) -> Acknowledgement;
}

/// A synchronous consumer of samples, driven by a [`SerialPort`](super::SerialPort).
///
/// Calls never overlap, so implementations need no internal locking.
pub trait SampleSink: Send + 'static {
    fn add_sample(&mut self, sample: Sample) -> Result<(), PortError>;
}

/// Failure reported by an ingestion port for one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortError {
    message: String,
    transient: bool,
}

impl PortError {
    /// A failure that may succeed if the same sample is submitted again.
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }

    /// A failure that will not go away on retry.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PortError {}
