use crate::sample::Sample;
use super::acknowledgement::{AckResult, AckSender};

/// # QueueItem
///
/// A submitted sample waiting for the serial worker, paired with the channel
/// its acknowledgement is answered on.
///
/// Dropping a `QueueItem` unanswered interrupts the submitter's wait.
pub struct QueueItem {
    sample: Sample,
    responder: AckSender,
}

impl QueueItem {
    pub fn new(sample: Sample, responder: AckSender) -> Self {
        Self {
            sample,
            responder,
        }
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    /// Split into the sample and its responder.
    pub fn into_parts(self) -> (Sample, AckSender) {
        (self.sample, self.responder)
    }

    /// Answer the submitter. Returns `false` if nobody is waiting anymore.
    pub fn respond(responder: AckSender, result: AckResult) -> bool {
        responder.send(result).is_ok()
    }
}
