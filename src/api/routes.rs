//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use std::path::Path;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{
    analyze_current_war_handler, capital_raids_handler, chat_handler,
    get_clan_handler, get_current_war_handler, get_player_handler,
    get_player_history_handler, get_war_log_handler, health_handler,
    league_info_handler, league_war_handler, AppState,
};
use crate::models::ErrorResponse;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: any origin, method, and header — the dashboard is served from
///   elsewhere
/// - Tracing: logs all requests
///
/// Unmatched paths fall through to static assets when a directory is
/// configured, else to a JSON 404.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/get-player", get(get_player_handler))
        .route("/get-player-history", get(get_player_history_handler))
        .route("/get-clan", get(get_clan_handler))
        .route("/get-current-war", get(get_current_war_handler))
        .route("/get-war-log", get(get_war_log_handler))
        .route("/clan-war-league-info", get(league_info_handler))
        .route("/clan-war-league-war", get(league_war_handler))
        .route("/get-capital-raids", get(capital_raids_handler))
        .route("/analyze-current-war", get(analyze_current_war_handler))
        .route("/chat", post(chat_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(not_found_handler),
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}
