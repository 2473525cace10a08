//! Path-synchronized update worker.
//!
//! ## Flow
//!
//! ```text
//! DispatchQueue ──dequeue──> dispatcher task ──spawn──> process(paths)
//!                                                         │
//!                                  one task per path  <───┘
//!                                         │
//!                          PathLocks::lock_for(path).lock()
//!                                         │
//!                     timeout(SyncOperation::sync(path), deadline)
//! ```
//!
//! Paths of one item run concurrently. Operations on the same path, from
//! any number of items, are serialized by that path's lock in arrival order.
//! A failed or timed-out path is logged and never retried.

pub mod dispatch;
pub mod locks;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::errors::SyncError;
use crate::sync::SyncOperation;

pub use dispatch::spawn_dispatcher;
pub use locks::PathLocks;

/// Outcome of one sync operation.
#[derive(Debug)]
pub struct SyncReport {
    pub path: String,
    pub elapsed: Duration,
    pub outcome: Result<(), SyncError>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs sync operations with per-path mutual exclusion and a deadline.
pub struct UpdateWorker {
    locks: PathLocks,
    operation: Arc<dyn SyncOperation>,
    timeout: Duration,
}

impl UpdateWorker {
    pub fn new(operation: Arc<dyn SyncOperation>, timeout: Duration) -> Self {
        Self {
            locks: PathLocks::new(),
            operation,
            timeout,
        }
    }

    pub fn locks(&self) -> &PathLocks {
        &self.locks
    }

    /// Sync every path in `paths`, each in its own task.
    ///
    /// Returns once all of them finished, one report per path in completion
    /// order.
    pub async fn process(self: Arc<Self>, paths: Vec<String>) -> Vec<SyncReport> {
        if paths.is_empty() {
            warn!("empty path set, nothing to sync");
            return Vec::new();
        }

        let mut tasks = JoinSet::new();
        for path in paths {
            let worker = Arc::clone(&self);
            tasks.spawn(async move { worker.sync_path(path).await });
        }

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!(error = %e, "sync task panicked"),
            }
        }
        reports
    }

    /// Sync a single path under its lock.
    pub async fn sync_path(&self, path: String) -> SyncReport {
        let lock = self.locks.lock_for(&path);
        let _guard = lock.lock().await;

        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.operation.sync(Path::new(&path)))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SyncError::TimedOut(self.timeout)),
        };
        let elapsed = started.elapsed();

        match &outcome {
            Ok(()) => info!(path = %path, elapsed = ?elapsed, "pull done"),
            Err(e) => warn!(path = %path, elapsed = ?elapsed, error = %e, "pull failed"),
        }

        SyncReport {
            path,
            elapsed,
            outcome,
        }
    }
}
