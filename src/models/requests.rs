//! Request DTOs for the gateway API
//!
//! Query strings and the chat body. Required-ness is checked in the
//! handlers so a missing parameter becomes a 400 with a readable message
//! instead of an extractor rejection.

use serde::{Deserialize, Serialize};

/// Query string carrying a single tag.
#[derive(Debug, Clone, Deserialize)]
pub struct TagQuery {
    pub tag: Option<String>,
}

/// Query string for the war log endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WarLogQuery {
    pub tag: Option<String>,
    pub limit: Option<u32>,
}

/// Query string for the league war endpoint: either a direct war tag or a
/// clan tag plus 1-based round number.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueWarQuery {
    pub war_tag: Option<String>,
    pub clan_tag: Option<String>,
    pub round: Option<u32>,
}

/// Query string for capital raid seasons.
#[derive(Debug, Clone, Deserialize)]
pub struct CapitalRaidsQuery {
    pub tag: Option<String>,
    pub limit: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// A single conversation message as exchanged with the model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Named action; anything unrecognized (or absent) is plain chat
    #[serde(default)]
    pub action: Option<String>,
    /// Accumulated conversation, forwarded verbatim for plain chat
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub player_tag: Option<String>,
    #[serde(default)]
    pub clan_tag: Option<String>,
}
