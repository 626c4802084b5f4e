//! # Ingestion port
//!
//! The seam between the pipeline and whatever consumes its samples.
//!
//! * [`IngestionPort`] - the asynchronous submit contract the dispatcher
//!   drives; every submission returns an [`Acknowledgement`].
//! * [`SerialPort`] - an [`IngestionPort`] serializing submissions onto one
//!   background worker that feeds a synchronous [`SampleSink`].
//! * [`SampleBuffer`] - an in-memory [`SampleSink`].
mod acknowledgement;
mod buffer;
mod core_trait;
mod queue_item;
mod serial;

pub use acknowledgement::{AckResult, AckSender, Acknowledgement};
pub use buffer::SampleBuffer;
pub use core_trait::{IngestionPort, PortError, SampleSink};
pub use serial::SerialPort;
