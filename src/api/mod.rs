//! API Module
//!
//! HTTP handlers and routing for the gateway's JSON surface.
//!
//! # Endpoints
//! - `GET /health` - liveness, version, cache stats
//! - `GET /get-player` - cached player fetch
//! - `GET /get-player-history` - persisted daily stat rows
//! - `GET /get-clan` - cached clan fetch
//! - `GET /get-current-war` - cached current-war fetch
//! - `GET /get-war-log` - cached war-log fetch
//! - `GET /clan-war-league-info` - cached league-group fetch
//! - `GET /clan-war-league-war` - direct war fetch or round resolver
//! - `GET /get-capital-raids` - cached capital-raid fetch
//! - `GET /analyze-current-war` - one-shot model analysis
//! - `POST /chat` - analysis orchestrator entry point

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
