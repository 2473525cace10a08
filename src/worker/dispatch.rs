//! The single consumer of the dispatch queue.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::UpdateWorker;
use crate::queue::DispatchReceiver;

/// Drain `queue` until every sender is gone.
///
/// Each item gets its own short-lived task so a slow pull never holds up the
/// next dequeue.
pub fn spawn_dispatcher(mut queue: DispatchReceiver, worker: Arc<UpdateWorker>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(item) = queue.dequeue().await {
            debug!(
                repository = %item.repository,
                paths = item.paths.len(),
                "dispatching"
            );
            let worker = Arc::clone(&worker);
            tokio::spawn(async move {
                let reports = worker.process(item.paths).await;
                let failed = reports.iter().filter(|r| !r.is_success()).count();
                debug!(
                    repository = %item.repository,
                    total = reports.len(),
                    failed,
                    "item finished"
                );
            });
        }
        info!("dispatch queue closed");
    })
}
