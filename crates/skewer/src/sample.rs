use std::fmt;

use crate::constant::CHANNELS;

/// A normalized image ready for the ingestion port.
///
/// `pixels` holds `side * side * 3` values in `[0, 1]`, row-major, with red,
/// green and blue interleaved per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub pixels: Vec<f32>,
    pub label: String,
    pub is_training: bool,
}

impl Sample {
    pub fn new(pixels: Vec<f32>, label: impl Into<String>, is_training: bool) -> Self {
        Self {
            pixels,
            label: label.into(),
            is_training,
        }
    }

    /// Expected `pixels` length for images of the given side.
    pub const fn len_for_side(side: usize) -> usize {
        side * side * CHANNELS
    }

    pub fn split(&self) -> Split {
        if self.is_training { Split::Train } else { Split::Test }
    }
}

/// Which half of a participant's data a manifest describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn is_training(self) -> bool {
        matches!(self, Split::Train)
    }

    /// Manifest resource for the 1-based `device`, e.g.
    /// `data/partition_0_train.txt` for device 1.
    pub fn manifest_name(self, data_root: &str, device: usize) -> String {
        let root = data_root.trim_end_matches('/');
        let partition = device.saturating_sub(1);
        if root.is_empty() {
            format!("partition_{partition}_{self}.txt")
        } else {
            format!("{root}/partition_{partition}_{self}.txt")
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Test => f.write_str("test"),
        }
    }
}

/// Lifecycle of one manifest entry as it moves through a unit of work.
///
/// States only move forward; terminal states accept no further transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SampleState {
    Pending,
    Decoded,
    Labeled,
    Normalized,
    Submitted,
    Acknowledged,
    Failed,
    Dropped,
}

impl SampleState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SampleState::Acknowledged | SampleState::Failed | SampleState::Dropped
        )
    }

    /// The state reached by finishing the current stage successfully.
    fn successor(self) -> Option<SampleState> {
        match self {
            SampleState::Pending => Some(SampleState::Decoded),
            SampleState::Decoded => Some(SampleState::Labeled),
            SampleState::Labeled => Some(SampleState::Normalized),
            SampleState::Normalized => Some(SampleState::Submitted),
            SampleState::Submitted => Some(SampleState::Acknowledged),
            _ => None,
        }
    }

    /// Move to `next` if that is a legal transition from `self`.
    ///
    /// Any non-terminal state may fail or be dropped.
    pub fn advance(self, next: SampleState) -> Option<SampleState> {
        let legal = match next {
            SampleState::Failed | SampleState::Dropped => !self.is_terminal(),
            _ => self.successor() == Some(next),
        };
        legal.then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_for_side() {
        assert_eq!(Sample::len_for_side(32), 3072);
        assert_eq!(Sample::len_for_side(1), 3);
    }

    #[test]
    fn test_split_round_trips_flag() {
        assert_eq!(Sample::new(vec![], "a", true).split(), Split::Train);
        assert_eq!(Sample::new(vec![], "a", false).split(), Split::Test);
        assert!(Split::Train.is_training());
        assert!(!Split::Test.is_training());
    }

    #[test]
    fn test_manifest_names_use_zero_based_partition() {
        assert_eq!(Split::Train.manifest_name("data", 1), "data/partition_0_train.txt");
        assert_eq!(Split::Test.manifest_name("data/", 10), "data/partition_9_test.txt");
        assert_eq!(Split::Test.manifest_name("", 3), "partition_2_test.txt");
    }

    #[test]
    fn test_happy_path_walks_forward() {
        let mut state = SampleState::Pending;
        for next in [
            SampleState::Decoded,
            SampleState::Labeled,
            SampleState::Normalized,
            SampleState::Submitted,
            SampleState::Acknowledged,
        ] {
            state = state.advance(next).expect("legal transition");
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_no_reentry_or_skipping() {
        assert_eq!(SampleState::Labeled.advance(SampleState::Decoded), None);
        assert_eq!(SampleState::Pending.advance(SampleState::Submitted), None);
        assert_eq!(SampleState::Acknowledged.advance(SampleState::Failed), None);
        assert_eq!(SampleState::Failed.advance(SampleState::Failed), None);
    }

    #[test]
    fn test_drop_from_any_live_state() {
        assert_eq!(
            SampleState::Pending.advance(SampleState::Dropped),
            Some(SampleState::Dropped)
        );
        assert_eq!(
            SampleState::Submitted.advance(SampleState::Dropped),
            Some(SampleState::Dropped)
        );
        assert_eq!(SampleState::Dropped.advance(SampleState::Dropped), None);
    }
}
