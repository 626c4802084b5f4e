use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use super::core_trait::PortError;

/// What the port reports once it is done with a sample.
pub type AckResult = Result<(), PortError>;

/// The answering half of an [`Acknowledgement`].
pub type AckSender = oneshot::Sender<AckResult>;

/// # Acknowledgement
///
/// The pending answer to one submission, backed by a Tokio oneshot channel.
///
/// Resolves to `Ok(result)` when the port answers, or to `Err(RecvError)` when
/// the port drops the sender without answering, which the dispatcher treats as
/// an interrupted wait.
pub struct Acknowledgement {
    /// The underlying channel receiver
    receiver: oneshot::Receiver<AckResult>
}

impl Acknowledgement {
    /// Create a linked sender and acknowledgement.
    pub fn channel() -> (AckSender, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { receiver: rx })
    }

    /// An acknowledgement that is already answered.
    pub fn ready(result: AckResult) -> Self {
        let (tx, ack) = Self::channel();
        // the receiver is alive in `ack`, so this cannot fail
        let _ = tx.send(result);
        ack
    }
}

impl Future for Acknowledgement {
    type Output = Result<AckResult, oneshot::error::RecvError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::test;

    #[test]
    async fn test_ready_resolves() {
        assert_eq!(Acknowledgement::ready(Ok(())).await, Ok(Ok(())));
    }

    #[test]
    async fn test_answer_is_forwarded() {
        let (tx, ack) = Acknowledgement::channel();
        tx.send(Err(PortError::permanent("no"))).unwrap();
        assert_eq!(ack.await, Ok(Err(PortError::permanent("no"))));
    }

    #[test]
    async fn test_dropped_sender_interrupts() {
        let (tx, ack) = Acknowledgement::channel();
        drop(tx);
        assert!(ack.await.is_err());
    }
}
