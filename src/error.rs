//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or malformed player/clan/war tag
    #[error("{0}")]
    InvalidTag(String),

    /// Non-2xx response from the Clash of Clans API; status and body are
    /// forwarded to the client verbatim
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// League group has no round at the requested position
    #[error("Round {0} not found")]
    RoundNotFound(u32),

    /// The requested round has an empty war-tag list
    #[error("No wars found for round {0}")]
    NoWarsInRound(u32),

    /// Every fetchable war in the round was checked without a match
    #[error("Clan war not found in this round")]
    WarNotFoundInRound,

    /// Missing credential or malformed server configuration
    #[error("{0}")]
    Config(String),

    /// Language-model call failed
    #[error("model request failed: {0}")]
    Model(String),

    /// Transport or persistence fault
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Upstream bodies are meaningful to the caller (rate limits, bad
        // key, not found) and pass through with their original status.
        if let GatewayError::Upstream { status, body } = self {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return (status, [(header::CONTENT_TYPE, "application/json")], body)
                .into_response();
        }

        let status = match &self {
            GatewayError::InvalidTag(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
