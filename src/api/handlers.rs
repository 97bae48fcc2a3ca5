//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint. Required parameters
//! are validated here, at the boundary; everything downstream works with
//! parsed `Tag`s.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::ai::{self, ModelClient};
use crate::cache::CacheStore;
use crate::clash::{CachedClient, UpstreamClient};
use crate::config::Config;
use crate::db::Database;
use crate::error::{GatewayError, Result};
use crate::models::{
    CapitalRaidsQuery, ChatRequest, ChatResponse, HealthResponse, LeagueWarQuery,
    StatRow, TagQuery, WarLogQuery,
};
use crate::tag::Tag;
use crate::tasks::spawn_stat_snapshot;

const DEFAULT_PAGE_LIMIT: u32 = 10;

// == App State ==
/// Application state shared across all handlers.
///
/// Built once from the configuration at startup; handlers receive
/// everything they touch through here, nothing through globals.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside upstream access
    pub clash: CachedClient,
    /// Daily stat snapshot store
    pub db: Database,
    /// Model client, present only when credentials are configured
    pub model: Option<ModelClient>,
    /// Shared cache store, also owned by the cleanup task
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates application state from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(RwLock::new(CacheStore::new(config.max_cache_entries)));
        let upstream = UpstreamClient::new(config)?;
        let clash = CachedClient::new(upstream, cache.clone());
        let db = Database::open(&config.db_path)?;
        let model = config.model.clone().map(ModelClient::new);

        Ok(Self {
            clash,
            db,
            model,
            cache,
        })
    }
}

fn require_tag(raw: Option<String>, message: &str) -> Result<Tag> {
    match raw.as_deref() {
        Some(raw) => Tag::parse(raw),
        None => Err(GatewayError::InvalidTag(message.to_string())),
    }
}

// == Handlers ==

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.cache.read().await.stats();
    Json(HealthResponse::ok(stats))
}

/// Handler for GET /get-player
///
/// On success the daily stat snapshot is spawned fire-and-forget; the
/// response never waits on it.
pub async fn get_player_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Player tag is required")?;
    let data = state.clash.player(&tag).await?;

    spawn_stat_snapshot(state.db.clone(), tag, data.clone());

    Ok(Json(data))
}

/// Handler for GET /get-player-history
pub async fn get_player_history_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Vec<StatRow>>> {
    let tag = require_tag(query.tag, "Player tag is required")?;
    let rows = state
        .db
        .history(&tag)
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))?;
    Ok(Json(rows))
}

/// Handler for GET /get-clan
pub async fn get_clan_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;
    Ok(Json(state.clash.clan(&tag).await?))
}

/// Handler for GET /get-current-war
pub async fn get_current_war_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;
    Ok(Json(state.clash.current_war(&tag).await?))
}

/// Handler for GET /get-war-log
pub async fn get_war_log_handler(
    State(state): State<AppState>,
    Query(query): Query<WarLogQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    Ok(Json(state.clash.war_log(&tag, limit).await?))
}

/// Handler for GET /clan-war-league-info
pub async fn league_info_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;
    Ok(Json(state.clash.league_group(&tag).await?))
}

/// Handler for GET /clan-war-league-war
///
/// Two shapes: a direct `warTag` lookup, or `clanTag` + `round` through
/// the round resolver.
pub async fn league_war_handler(
    State(state): State<AppState>,
    Query(query): Query<LeagueWarQuery>,
) -> Result<Json<Value>> {
    if let Some(war_tag) = query.war_tag.as_deref() {
        let war_tag = Tag::parse(war_tag)?;
        return Ok(Json(state.clash.league_war(&war_tag).await?));
    }

    match (query.clan_tag.as_deref(), query.round) {
        (Some(clan_tag), Some(round)) => {
            let clan_tag = Tag::parse(clan_tag)?;
            Ok(Json(state.clash.league_war_for_round(&clan_tag, round).await?))
        }
        _ => Err(GatewayError::InvalidTag(
            "War tag OR (clanTag and round) is required".to_string(),
        )),
    }
}

/// Handler for GET /get-capital-raids
pub async fn capital_raids_handler(
    State(state): State<AppState>,
    Query(query): Query<CapitalRaidsQuery>,
) -> Result<Json<Value>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    Ok(Json(
        state
            .clash
            .capital_raids(&tag, limit, query.before.as_deref(), query.after.as_deref())
            .await?,
    ))
}

/// Handler for GET /analyze-current-war
pub async fn analyze_current_war_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<ChatResponse>> {
    let tag = require_tag(query.tag, "Clan tag is required")?;

    let request = ChatRequest {
        action: Some("analyze-current-war".to_string()),
        messages: Vec::new(),
        player_tag: None,
        clan_tag: Some(tag.canonical().to_string()),
    };

    let response = ai::run(&state.clash, state.model.as_ref(), request).await?;
    Ok(Json(ChatResponse { response }))
}

/// Handler for POST /chat
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let response = ai::run(&state.clash, state.model.as_ref(), request).await?;
    Ok(Json(ChatResponse { response }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::path::PathBuf;

    /// State wired to an arbitrary upstream base; no model, in-memory db.
    pub(crate) fn state_for(upstream_base: &str) -> AppState {
        let config = Config {
            server_port: 0,
            upstream_base: upstream_base.to_string(),
            api_token: "test-token".to_string(),
            relay: None,
            model: None,
            db_path: PathBuf::new(),
            static_dir: None,
            max_cache_entries: 100,
            cleanup_interval: 60,
        };

        let cache = Arc::new(RwLock::new(CacheStore::new(config.max_cache_entries)));
        let upstream = UpstreamClient::new(&config).unwrap();
        AppState {
            clash: CachedClient::new(upstream, cache.clone()),
            db: Database::open_in_memory().unwrap(),
            model: None,
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        test_support::state_for("http://127.0.0.1:9/v1")
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(state())).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.cache.hits, 0);
    }

    #[tokio::test]
    async fn test_get_player_missing_tag() {
        let result =
            get_player_handler(State(state()), Query(TagQuery { tag: None })).await;
        assert!(matches!(result, Err(GatewayError::InvalidTag(_))));
    }

    #[tokio::test]
    async fn test_league_war_requires_params() {
        let result = league_war_handler(
            State(state()),
            Query(LeagueWarQuery {
                war_tag: None,
                clan_tag: Some("#2PP".to_string()),
                round: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::InvalidTag(_))));
    }

    #[tokio::test]
    async fn test_chat_without_model_is_config_error() {
        let request = ChatRequest {
            action: Some("analyze-clan".to_string()),
            messages: Vec::new(),
            player_tag: None,
            clan_tag: Some("#2PP".to_string()),
        };
        let result = chat_handler(State(state()), Json(request)).await;
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
