//! Relay Forwarder
//!
//! A minimal trusted hop for networks where the upstream API cannot be
//! reached directly: the gateway sends its request here with the real
//! target in the `url` query parameter, and the relay re-issues it.
//!
//! The relay is transparent and stateless: it forwards the method, body,
//! and inbound `Authorization` header, accepts any status from the target
//! (4xx/5xx are not local errors), and mirrors status and body back
//! verbatim. No retries, no caching, no payload logging.

use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::models::ErrorResponse;

const AUTH_HEADER: &str = "x-relay-auth";

// == Relay State ==
/// Shared state for the relay service.
#[derive(Clone)]
pub struct RelayState {
    secret: String,
    http: reqwest::Client,
}

impl RelayState {
    /// Creates relay state around the configured shared secret.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            http: reqwest::Client::new(),
        }
    }
}

/// Builds the relay router: a single catch-all-methods `/relay` route.
pub fn create_relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/relay", any(relay_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for `ALL /relay?url=<encoded target>`.
///
/// Auth is checked before anything else is inspected; a request with the
/// wrong secret learns nothing beyond the 401.
async fn relay_handler(
    State(state): State<RelayState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    if presented != Some(state.secret.as_str()) {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized Relay Access");
    }

    let Some(target) = query.as_deref().and_then(target_url) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing target URL");
    };

    let mut request = state
        .http
        .request(method, target)
        .header(header::ACCEPT, "application/json");
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        request = request.header(header::AUTHORIZATION, auth.clone());
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "relay forward failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let status = response.status();
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

    match response.bytes().await {
        Ok(bytes) => {
            let mut builder = Response::builder().status(status);
            if let Some(content_type) = content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            builder
                .body(Body::from(bytes))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(e) => {
            warn!(error = %e, "relay response read failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Extracts the `url` parameter from the raw query string.
fn target_url(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
