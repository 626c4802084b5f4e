//! Module for handling long-lived background tasks.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use tokio::{task::JoinHandle, sync::Notify};

/// A handle owning a background task that sleeps until it is notified.
///
/// The task receives a running flag and a notifier. It should loop while the
/// flag is set and park on the notifier between rounds of work. Dropping the
/// handle stops the task; [`WorkerHandle::join`] stops it and waits for it.
///
/// # Example
///
/// ```ignore
/// let worker = WorkerHandle::spawn(|running, notifier| {
///     tokio::spawn(async move {
///         while running.load(Ordering::SeqCst) {
///             notifier.notified().await;
///             // drain queued work
///         }
///     })
/// });
/// worker.notify();
/// ```
pub struct WorkerHandle {
    /// Cleared once the worker should stop
    running: Arc<AtomicBool>,

    /// `None` once shutdown has taken the task
    handle: Option<JoinHandle<()>>,

    /// Wakes the worker
    notifier: Arc<Notify>,
}

impl WorkerHandle {
    /// Spawn the worker by handing `task` the running flag and the notifier.
    pub fn spawn<F>(task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>, Arc<Notify>) -> JoinHandle<()>,
    {
        let running = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(Notify::new());
        let handle = task(running.clone(), notifier.clone());

        Self {
            running,
            handle: Some(handle),
            notifier,
        }
    }

    /// Wake the worker. A notification sent while it is busy is kept for
    /// its next wait.
    pub fn notify(&self) {
        self.notifier.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn signal_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_one();
    }

    /// Ask the worker to stop without waiting for it.
    ///
    /// The task is detached and left to observe the cleared flag on its own.
    pub fn shutdown(&mut self) {
        self.signal_stop();
        self.handle.take();
    }

    /// Ask the worker to stop and wait until it has.
    ///
    /// Returns `false` if the task panicked.
    pub async fn join(mut self) -> bool {
        self.signal_stop();
        match self.handle.take() {
            Some(handle) => handle.await.is_ok(),
            None => true,
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
