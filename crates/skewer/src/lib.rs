//! # Skewer
//!
//! Concurrent ingestion of labeled image samples into an on-device model.
//!
//! ## Overview
//!
//! A participant's data is described by two manifests, one for training and
//! one for test, each listing one image path per line. Skewer reads a
//! manifest, decodes every image it names, derives its label from the path,
//! normalizes its pixels into `[0, 1]` and submits the result to an
//! ingestion port, waiting for the port to acknowledge each sample.
//!
//! Key components include:
//!
//! - An asset abstraction over the filesystem or memory
//! - A fixed-size worker pool fed from a bounded queue
//! - Per-sample outcomes, so one bad image never fails a load
//! - A serializing port for synchronous model backends
//!
//! ## Architecture
//!
//! ### Loads
//!
//! The [`dispatch::Dispatcher`] starts a [`dispatch::ManifestLoad`] per
//! manifest. The load reports when reading has finished and, separately,
//! when every unit of work has reached a terminal state, yielding a
//! [`dispatch::LoadReport`].
//!
//! ### Ports
//!
//! The [`port::IngestionPort`] trait is the only thing the dispatcher knows
//! about the model. [`port::SerialPort`] adapts any synchronous
//! [`port::SampleSink`] by running it on a single background worker.
//!
//! ### Assumptions
//! - Sample paths have the form `<root>/<category>/<label>/...`
//! - Images are square, `side` x `side` pixels, 32 by default
//! - Normalized pixels are row-major with red, green and blue interleaved
//!
//! ## Features
//!
//! - **candle** - Enables conversion of samples into candle tensors
//! - **burn** - Enables conversion of samples into burn tensors
//!
//! ## Logging
//!
//! Progress and failures are reported through the [`log`] facade; install
//! any logger (e.g. `env_logger`) to see them.

mod error;

pub mod asset;
pub mod backend;
pub mod config;
pub mod constant;
pub mod dispatch;
pub mod label;
pub mod manifest;
pub mod normalize;
pub mod port;
pub mod runtime;
pub mod sample;

pub use error::{Error, Result};
