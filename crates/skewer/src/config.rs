use std::time::Duration;

use crate::constant::{PARTITIONS, PROGRESS_INTERVAL};
use crate::error::{Error, Result};

/// Tuning knobs for a [`Dispatcher`](crate::dispatch::Dispatcher).
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Directory prefix joined in front of every manifest line.
    pub data_root: String,
    /// Size of the worker pool; the maximum number of units in flight.
    pub workers: usize,
    /// Capacity of the queue between the manifest reader and the workers.
    pub queue_capacity: usize,
    /// Upper bound on one wait for an acknowledgement from the port.
    pub submit_timeout: Duration,
    /// Attempts per sample, counting the first, for transient port failures.
    pub max_submit_attempts: usize,
    /// Pause between two attempts of the same sample.
    pub retry_backoff: Duration,
    /// A progress line is logged every `progress_interval` entries.
    pub progress_interval: usize,
    /// Number of participant partitions; device ids run from 1 to this value.
    pub partitions: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            workers: 4,
            queue_capacity: 64,
            submit_timeout: Duration::from_secs(30),
            max_submit_attempts: 3,
            retry_backoff: Duration::from_millis(50),
            progress_interval: PROGRESS_INTERVAL,
            partitions: PARTITIONS,
        }
    }
}

impl DispatcherConfig {
    pub fn with_data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_submit_timeout(mut self, submit_timeout: Duration) -> Self {
        self.submit_timeout = submit_timeout;
        self
    }

    pub fn with_max_submit_attempts(mut self, attempts: usize) -> Self {
        self.max_submit_attempts = attempts;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions;
        self
    }

    /// Reject settings the dispatcher cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Configuration("workers must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Configuration("queue_capacity must be at least 1".into()));
        }
        if self.max_submit_attempts == 0 {
            return Err(Error::Configuration("max_submit_attempts must be at least 1".into()));
        }
        if self.progress_interval == 0 {
            return Err(Error::Configuration("progress_interval must be at least 1".into()));
        }
        if self.submit_timeout.is_zero() {
            return Err(Error::Configuration("submit_timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// Join a manifest line onto the data root.
    pub(crate) fn resolve(&self, line: &str) -> String {
        let root = self.data_root.trim_end_matches('/');
        if root.is_empty() {
            line.to_string()
        } else {
            format!("{root}/{line}")
        }
    }
}
