//! Typed error hierarchy for gitwh.
//!
//! Three top-level enums cover the three subsystems:
//! - `WebhookError`: request decoding and authorization failures
//! - `SyncError`: per-path update failures inside the worker
//! - `ConfigError`: configuration loading and validation failures

use std::path::PathBuf;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that terminate the handling of a single webhook request.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("repository {0} not supported")]
    UnknownRepository(String),

    #[error("secret is not valid for repository {0}")]
    InvalidSecret(String),

    #[error("dispatch queue is closed")]
    QueueClosed,
}

impl WebhookError {
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        WebhookError::MalformedPayload(reason.to_string())
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Decode and authorization failures share one body so callers cannot
        // probe which repositories are configured.
        match self {
            WebhookError::MalformedPayload(_)
            | WebhookError::UnknownRepository(_)
            | WebhookError::InvalidSecret(_) => {
                (StatusCode::BAD_REQUEST, "Bad Request").into_response()
            }
            WebhookError::QueueClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response()
            }
        }
    }
}

/// Errors from a single sync operation on one path.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to spawn git in {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for git in {path}: {source}")]
    Wait {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("sync timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// Errors from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown config file extension: {0:?}")]
    UnknownExtension(String),

    #[error("failed to decode config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to decode config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
