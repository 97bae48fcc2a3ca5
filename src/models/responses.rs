//! Response DTOs for the gateway API

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "ok")
    pub status: String,
    /// Crate version
    pub version: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Cache hit/miss counters
    pub cache: CacheStats,
}

impl HealthResponse {
    /// Creates a new HealthResponse with the current timestamp.
    pub fn ok(cache: CacheStats) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache,
        }
    }
}

/// Response body for chat and analysis endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// The model's text
    pub response: String,
}

/// One persisted daily stat row, as returned by the history endpoint.
///
/// Serialized snake_case; the dashboard charts read these keys directly.
#[derive(Debug, Clone, Serialize)]
pub struct StatRow {
    pub date: String,
    pub gold: i64,
    pub elixir: i64,
    pub dark_elixir: i64,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::ok(CacheStats::new());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("version"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("cache"));
    }

    #[test]
    fn test_stat_row_snake_case_keys() {
        let row = StatRow {
            date: "2026-08-07".to_string(),
            gold: 1,
            elixir: 2,
            dark_elixir: 3,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("dark_elixir").is_some());
        assert!(value.get("darkElixir").is_none());
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
