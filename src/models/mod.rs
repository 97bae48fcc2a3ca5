//! Request and Response models for the gateway API
//!
//! DTOs for HTTP query strings, the chat body, and the JSON responses
//! the gateway produces itself (upstream payloads pass through as
//! opaque `serde_json::Value`).

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CapitalRaidsQuery, ChatMessage, ChatRequest, LeagueWarQuery, TagQuery,
    WarLogQuery,
};
pub use responses::{ChatResponse, ErrorResponse, HealthResponse, StatRow};
