//! Inbound push notifications.
//!
//! Both supported hosting formats are normalized into a [`Notification`]
//! before authorization; see [`payload::normalize`].

pub mod payload;

pub use payload::{MAX_BODY_BYTES, SECRET_HEADER, normalize};

/// Canonical record of one push event, independent of the wire format.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub pusher_name: String,
    pub pusher_email: String,
    pub commit_id: String,
    pub commit_message: String,
    pub repository: String,
    /// Shared secret presented by the caller; empty when the format has none.
    pub secret: String,
}

impl std::fmt::Debug for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notification")
            .field("pusher_name", &self.pusher_name)
            .field("pusher_email", &self.pusher_email)
            .field("commit_id", &self.commit_id)
            .field("commit_message", &self.commit_message)
            .field("repository", &self.repository)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}
