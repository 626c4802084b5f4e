//! # Sample dispatch
//!
//! Turns manifests into acknowledged samples.
//!
//! * [`Dispatcher`] - owns the asset source, the ingestion port and the
//!   configuration; starts loads.
//! * [`ManifestLoad`] - handle on a running load; read completion and work
//!   completion are observed separately.
//! * [`LoadReport`] / [`DeviceReport`] - per-entry [`Outcome`]s of finished
//!   loads.
//!
//! A load runs one reader task feeding a bounded queue and a fixed pool of
//! workers draining it. Every unit of work runs its stages in order (read,
//! decode, label, normalize, submit) and ends acknowledged, failed or
//! dropped; no unit can fail another.
mod device;
mod dispatcher;
mod load;
mod report;
mod unit;

pub use device::DeviceReport;
pub use dispatcher::Dispatcher;
pub use load::ManifestLoad;
pub use report::{LoadReport, Outcome};
