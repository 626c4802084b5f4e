use std::collections::BTreeSet;

use crate::sample::Sample;
use super::core_trait::{PortError, SampleSink};

/// In-memory [`SampleSink`] keeping training and test samples apart.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    training: Vec<Sample>,
    testing: Vec<Sample>,
    limit: Option<usize>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer refusing samples once it holds `limit` of them.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn training(&self) -> &[Sample] {
        &self.training
    }

    pub fn testing(&self) -> &[Sample] {
        &self.testing
    }

    pub fn training_size(&self) -> usize {
        self.training.len()
    }

    pub fn testing_size(&self) -> usize {
        self.testing.len()
    }

    /// Distinct labels seen across both splits.
    pub fn labels(&self) -> BTreeSet<String> {
        self.training
            .iter()
            .chain(self.testing.iter())
            .map(|s| s.label.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.training.len() + self.testing.len()
    }
}

impl SampleSink for SampleBuffer {
    fn add_sample(&mut self, sample: Sample) -> Result<(), PortError> {
        if self.limit.is_some_and(|limit| self.len() >= limit) {
            return Err(PortError::permanent("sample buffer is full"));
        }
        if sample.is_training {
            self.training.push(sample);
        } else {
            self.testing.push(sample);
        }
        Ok(())
    }
}
