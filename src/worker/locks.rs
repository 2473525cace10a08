//! Lazily created per-path locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Exclusive region per filesystem path.
///
/// Entries are created on first use and never removed; the key space is the
/// set of configured folders. Insertion only locks one shard of the map, and
/// that shard guard is released before the returned lock is awaited.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `path`, created if this is its first reference.
    pub fn lock_for(&self, path: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(path) {
            return Arc::clone(lock.value());
        }
        let entry = self.locks.entry(path.to_string()).or_default();
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
