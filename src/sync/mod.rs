//! Operations that bring a working copy up to date.

pub mod git;

use std::path::Path;

use async_trait::async_trait;

use crate::errors::SyncError;

pub use git::GitPull;

/// Updates one working copy in place.
///
/// Implementations must stop their work when the returned future is dropped;
/// the worker enforces the deadline by dropping it.
#[async_trait]
pub trait SyncOperation: Send + Sync {
    async fn sync(&self, path: &Path) -> Result<(), SyncError>;
}
