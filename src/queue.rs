//! Bounded FIFO between the HTTP handlers and the update worker.
//!
//! Producers block on a full queue instead of dropping work; a single
//! consumer drains it in arrival order.

use tokio::sync::mpsc;

use crate::errors::WebhookError;

/// Paths resolved for one authorized notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchItem {
    pub repository: String,
    pub paths: Vec<String>,
}

impl DispatchItem {
    pub fn new(repository: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            repository: repository.into(),
            paths,
        }
    }
}

/// Create a queue holding at most `capacity` items (minimum 1).
pub fn dispatch_queue(capacity: usize) -> (DispatchSender, DispatchReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (DispatchSender { tx, capacity }, DispatchReceiver { rx })
}

/// Producer half, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct DispatchSender {
    tx: mpsc::Sender<DispatchItem>,
    capacity: usize,
}

impl DispatchSender {
    /// Wait for a free slot and enqueue `item`.
    ///
    /// Only fails once the consumer has gone away.
    pub async fn enqueue(&self, item: DispatchItem) -> Result<(), WebhookError> {
        self.tx
            .send(item)
            .await
            .map_err(|_| WebhookError::QueueClosed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free slots right now.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer half, owned by the dispatcher task.
#[derive(Debug)]
pub struct DispatchReceiver {
    rx: mpsc::Receiver<DispatchItem>,
}

impl DispatchReceiver {
    /// Wait for the next item; `None` once every sender is dropped and the
    /// queue is empty.
    pub async fn dequeue(&mut self) -> Option<DispatchItem> {
        self.rx.recv().await
    }

    pub fn try_dequeue(&mut self) -> Option<DispatchItem> {
        self.rx.try_recv().ok()
    }
}
