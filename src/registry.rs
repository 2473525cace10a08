//! Static repository registry and request authorization.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::WebhookError;
use crate::webhook::Notification;

/// One configured repository: an optional shared secret and the working
/// copies to pull when it is pushed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryEntry {
    /// Empty means the secret is not checked.
    #[serde(default)]
    pub secret: String,
    #[serde(default, alias = "paths")]
    pub folders: Vec<String>,
}

/// Read-only mapping from repository identifier to its entry.
#[derive(Debug, Clone, Default)]
pub struct RepositoryRegistry {
    repos: HashMap<String, RepositoryEntry>,
}

impl RepositoryRegistry {
    pub fn new(repos: HashMap<String, RepositoryEntry>) -> Self {
        Self { repos }
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryEntry> {
        self.repos.get(name)
    }

    /// Resolve a notification to the paths that should be pulled.
    ///
    /// Fails with `UnknownRepository` when the repository is not configured and
    /// with `InvalidSecret` when the entry has a secret that differs from the
    /// presented one. Paths are returned as configured.
    pub fn authorize(
        &self,
        notification: &Notification,
        requester: &str,
    ) -> Result<Vec<String>, WebhookError> {
        let repo = notification.repository.as_str();
        let entry = self
            .get(repo)
            .ok_or_else(|| WebhookError::UnknownRepository(repo.to_string()))?;

        if !entry.secret.is_empty() && entry.secret != notification.secret {
            warn!(requester, repository = repo, "secret mismatch");
            return Err(WebhookError::InvalidSecret(repo.to_string()));
        }

        info!(
            requester,
            repository = repo,
            pusher = %notification.pusher_name,
            email = %notification.pusher_email,
            "push accepted"
        );
        if !notification.commit_message.is_empty() {
            info!(
                commit = %notification.commit_id,
                message = %notification.commit_message,
                "commit message"
            );
        }

        Ok(entry.folders.clone())
    }
}
