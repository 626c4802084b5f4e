use log::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sample::{SampleState, Split};

/// How one unit of work ended.
#[derive(Debug)]
pub enum Outcome {
    /// The port accepted the sample.
    Acknowledged,
    /// The unit failed; the sample never reached the model.
    Failed(Error),
    /// The unit was interrupted or cancelled; the sample was not ingested and
    /// may be retried by the caller.
    Dropped(Error),
}

impl Outcome {
    /// The terminal [`SampleState`] this outcome corresponds to.
    pub fn state(&self) -> SampleState {
        match self {
            Outcome::Acknowledged => SampleState::Acknowledged,
            Outcome::Failed(_) => SampleState::Failed,
            Outcome::Dropped(_) => SampleState::Dropped,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Acknowledged => None,
            Outcome::Failed(e) | Outcome::Dropped(e) => Some(e),
        }
    }
}

impl From<Result<()>> for Outcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Acknowledged,
            Err(e) if e.is_drop() => Outcome::Dropped(e),
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Summary of one manifest load, filled in as units finish.
///
/// Indices refer to manifest lines and are kept sorted.
#[derive(Debug)]
pub struct LoadReport {
    pub load_id: Uuid,
    pub manifest: String,
    pub split: Split,
    /// Lines read from the manifest.
    pub lines_read: usize,
    pub acknowledged: Vec<usize>,
    pub failures: Vec<(usize, Error)>,
    pub dropped: Vec<(usize, Error)>,
}

impl LoadReport {
    pub(crate) fn new(load_id: Uuid, manifest: impl Into<String>, split: Split) -> Self {
        Self {
            load_id,
            manifest: manifest.into(),
            split,
            lines_read: 0,
            acknowledged: Vec::new(),
            failures: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, index: usize, outcome: Outcome) {
        match outcome {
            Outcome::Acknowledged => self.acknowledged.push(index),
            Outcome::Failed(e) => self.failures.push((index, e)),
            Outcome::Dropped(e) => self.dropped.push((index, e)),
        }
    }

    /// Sort by manifest position and log the summary.
    pub(crate) fn seal(mut self) -> Self {
        self.acknowledged.sort_unstable();
        self.failures.sort_by_key(|(index, _)| *index);
        self.dropped.sort_by_key(|(index, _)| *index);

        info!(
            "load {}: {} manifest '{}' done, {} read, {} acknowledged, {} failed, {} dropped",
            self.load_id,
            self.split,
            self.manifest,
            self.lines_read,
            self.acknowledged.len(),
            self.failures.len(),
            self.dropped.len(),
        );
        if !self.dropped.is_empty() {
            warn!(
                "load {}: {} sample(s) dropped before acknowledgement",
                self.load_id,
                self.dropped.len()
            );
        }
        self
    }

    /// Units that reached a terminal state.
    pub fn processed(&self) -> usize {
        self.acknowledged.len() + self.failures.len() + self.dropped.len()
    }

    /// Every line read was acknowledged.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.dropped.is_empty() && self.acknowledged.len() == self.lines_read
    }

    pub fn failure(&self, index: usize) -> Option<&Error> {
        self.failures
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, e)| e)
    }
}
