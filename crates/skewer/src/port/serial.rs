use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::{Mutex, Notify};
use tokio::time::error::Elapsed;

use crate::runtime::WorkerHandle;
use crate::sample::Sample;
use super::acknowledgement::Acknowledgement;
use super::core_trait::{IngestionPort, SampleSink};
use super::queue_item::QueueItem;

/// An [`IngestionPort`] that funnels concurrent submissions into one
/// background worker, which feeds them to a [`SampleSink`] one at a time in
/// arrival order.
///
/// Dropping the port stops the worker; samples still queued at that point are
/// discarded and their submitters see an interrupted wait.
pub struct SerialPort<S> {
    /// Submissions not yet picked up by the worker
    waiting: Arc<Mutex<VecDeque<QueueItem>>>,

    /// The sink, shared with the worker so callers can inspect it
    sink: Arc<Mutex<S>>,

    handle: WorkerHandle,
}

impl<S> SerialPort<S>
where
    S: SampleSink,
{
    /// Start a worker feeding `sink`. Must be called inside a Tokio runtime.
    pub fn new(sink: S) -> Self {
        let waiting = Arc::new(Mutex::new(VecDeque::new()));
        let sink = Arc::new(Mutex::new(sink));

        let handle = WorkerHandle::spawn({
            let waiting = waiting.clone();
            let sink = sink.clone();
            move |running, notifier| {
                tokio::spawn(async move {
                    serial_loop(sink, running, notifier, waiting).await;
                })
            }
        });

        Self {
            waiting,
            sink,
            handle,
        }
    }

    /// Run `f` against the sink while the worker is held off.
    pub async fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut sink = self.sink.lock().await;
        f(&mut sink)
    }

    /// Number of submissions the worker has not picked up yet.
    pub async fn pending(&self) -> usize {
        self.waiting.lock().await.len()
    }
}

#[async_trait]
impl<S> IngestionPort for SerialPort<S>
where
    S: SampleSink,
{
    async fn submit(&self, sample: Sample) -> Acknowledgement {
        let (tx, ack) = Acknowledgement::channel();
        {
            let mut waiting = self.waiting.lock().await;
            waiting.push_back(QueueItem::new(sample, tx));
        }
        // wake the worker so it drains the queue
        self.handle.notify();
        ack
    }
}

async fn serial_loop<S: SampleSink>(
    sink: Arc<Mutex<S>>,
    running: Arc<AtomicBool>,
    notifier: Arc<Notify>,
    waiting: Arc<Mutex<VecDeque<QueueItem>>>,
) {
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let batch: Vec<QueueItem> = {
            let mut waiting = waiting.lock().await;
            waiting.drain(..).collect()
        };

        if batch.is_empty() {
            // nothing queued; park until notified or re-check periodically
            let _ = timeout_await_notifier(&notifier).await;
            continue;
        }

        let mut sink = sink.lock().await;
        for item in batch {
            let (sample, responder) = item.into_parts();
            let result = sink.add_sample(sample);
            if !QueueItem::respond(responder, result) {
                debug!("submitter stopped waiting before its sample was acknowledged");
            }
        }
    }
}

#[inline]
async fn timeout_await_notifier(notifier: &Notify) -> Result<(), Elapsed> {
    tokio::time::timeout(
        Duration::from_millis(100),
        notifier.notified(),
    ).await
}
