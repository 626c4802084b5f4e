//! # Runtime plumbing
//!
//! * [`worker`] - a handle over a long-lived background task that parks on a
//!   notifier between rounds of work and is stopped when the handle drops.
//!
//! * [`cancel`] - the cancellation token threaded through every unit of work
//!   of a manifest load.
pub mod worker;
pub mod cancel;

pub use cancel::CancelToken;
pub use worker::WorkerHandle;
