//! Webhook endpoint handler.

use std::net::SocketAddr;

use axum::body::to_bytes;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use tracing::{info, warn};

use super::AppState;
use crate::errors::WebhookError;
use crate::queue::DispatchItem;
use crate::webhook::{MAX_BODY_BYTES, normalize};

/// Accept a push notification and queue its paths for pulling.
///
/// # Response
///
/// - 200 OK: paths queued (waits while the queue is full)
/// - 400 Bad Request: payload could not be decoded, or the repository is
///   unknown, or the secret does not match
/// - 503 Service Unavailable: the server is shutting down
pub async fn webhook_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<StatusCode, WebhookError> {
    let requester = requester(&request);
    info!(requester = %requester, "request");

    let outcome = accept(&state, &requester, request).await;
    if let Err(e) = &outcome {
        warn!(requester = %requester, error = %e, "bad request");
    }
    outcome
}

async fn accept(
    state: &AppState,
    requester: &str,
    request: Request,
) -> Result<StatusCode, WebhookError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(WebhookError::malformed)?;

    let notification = normalize(&parts.headers, parts.uri.query(), &body)?;
    let paths = state.registry().authorize(&notification, requester)?;

    state
        .queue()
        .enqueue(DispatchItem::new(notification.repository, paths))
        .await?;
    Ok(StatusCode::OK)
}

/// Fallback for every unknown route.
pub async fn not_found(request: Request) -> (StatusCode, &'static str) {
    warn!(
        requester = %requester(&request),
        uri = %request.uri(),
        "not found"
    );
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Client address, honoring proxy headers before the peer address.
fn requester(request: &Request) -> String {
    forwarded_for(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_string)
}
