//! Wire formats for push notifications.
//!
//! | Format   | Content-Type                        | Secret                  |
//! |----------|-------------------------------------|-------------------------|
//! | GitHub   | `application/x-www-form-urlencoded` | none                    |
//! | GitLab   | `application/json`                  | `X-Gitlab-Token` header |
//!
//! The content type is only sniffed, never validated against a schema:
//! anything that is not JSON is decoded as a GitHub form.

use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};

use super::Notification;
use crate::errors::WebhookError;

/// Header carrying the shared secret for JSON deliveries.
pub const SECRET_HEADER: &str = "x-gitlab-token";

/// Largest request body accepted by the ingestion endpoint.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Form field holding the JSON document in GitHub form deliveries.
const FORM_FIELD: &str = "payload";

#[derive(Debug, Default, Deserialize)]
struct Person {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HeadCommit {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubPayload {
    #[serde(default)]
    pusher: Option<Person>,
    #[serde(default)]
    head_commit: Option<HeadCommit>,
    #[serde(default)]
    repository: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct GitlabCommit {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    author: Option<Person>,
}

#[derive(Debug, Deserialize)]
struct GitlabPayload {
    #[serde(default)]
    project: Option<Named>,
    #[serde(default)]
    commits: Option<Vec<GitlabCommit>>,
}

/// Decode a request into a [`Notification`].
///
/// `query` is the raw URL query string; GitHub form fields are looked up in the
/// body first and in the query second.
pub fn normalize(
    headers: &HeaderMap,
    query: Option<&str>,
    body: &[u8],
) -> Result<Notification, WebhookError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    debug!(content_type, "decoding payload");

    if is_json(content_type) {
        gitlab_payload(headers, body)
    } else {
        github_payload(query, body)
    }
}

/// True for `application/json`, ignoring case and media type parameters.
fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

fn github_payload(query: Option<&str>, body: &[u8]) -> Result<Notification, WebhookError> {
    let raw = form_field(body, FORM_FIELD)
        .or_else(|| query.and_then(|q| form_field(q.as_bytes(), FORM_FIELD)))
        .ok_or_else(|| WebhookError::malformed("form has no payload field"))?;

    let payload: GithubPayload = serde_json::from_str(&raw).map_err(WebhookError::malformed)?;

    let pusher = payload.pusher.unwrap_or_default();
    let commit = payload.head_commit.unwrap_or_default();
    let repository = payload.repository.unwrap_or_default();

    Ok(Notification {
        pusher_name: pusher.name.unwrap_or_default(),
        pusher_email: pusher.email.unwrap_or_default(),
        commit_id: commit.id.unwrap_or_default(),
        commit_message: commit.message.unwrap_or_default(),
        repository: repository.name.unwrap_or_default(),
        secret: String::new(),
    })
}

fn gitlab_payload(headers: &HeaderMap, body: &[u8]) -> Result<Notification, WebhookError> {
    let payload: GitlabPayload = serde_json::from_slice(body).map_err(WebhookError::malformed)?;

    let mut commits = payload.commits.unwrap_or_default();
    if commits.is_empty() {
        return Err(WebhookError::malformed("push has no commits"));
    }
    if commits.len() > 1 {
        warn!(commits = commits.len(), "multiple commits in one hook, using the first");
    }
    let commit = commits.swap_remove(0);
    let author = commit.author.unwrap_or_default();

    let secret = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    Ok(Notification {
        pusher_name: author.name.unwrap_or_default(),
        pusher_email: author.email.unwrap_or_default(),
        commit_id: commit.id.unwrap_or_default(),
        commit_message: commit.message.unwrap_or_default(),
        repository: payload.project.unwrap_or_default().name.unwrap_or_default(),
        secret,
    })
}

fn form_field(data: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(data)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
