//! Analysis Orchestrator
//!
//! Maps named chat actions onto fetch → summarize → prompt → model-call
//! pipelines. Analysis actions are fresh, scoped requests: they discard
//! the client's message history and send a single user message built from
//! a fixed template. Plain chat forwards the history verbatim.

use serde_json::Value;
use tracing::warn;

use crate::ai::ModelClient;
use crate::clash::CachedClient;
use crate::error::{GatewayError, Result};
use crate::models::{ChatMessage, ChatRequest};
use crate::summary::{summarize_clan, summarize_player, summarize_war};
use crate::tag::Tag;

/// System prompt sent with every model call.
pub const SYSTEM_PROMPT: &str = "You are a Clash of Clans expert assistant.";

/// War-log page size used for analysis; the log is already a bounded list
/// so it is embedded without summarization.
const WAR_LOG_ANALYSIS_LIMIT: u32 = 10;

// == Action ==
/// The named actions a chat request can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Chat,
    AnalyzePlayer,
    AnalyzeClan,
    AnalyzeCurrentWar,
    AnalyzeWarLog,
}

impl Action {
    /// Parses an action string; anything unrecognized falls back to chat.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("analyze-player") => Action::AnalyzePlayer,
            Some("analyze-clan") => Action::AnalyzeClan,
            Some("analyze-current-war") => Action::AnalyzeCurrentWar,
            Some("analyze-war-log") => Action::AnalyzeWarLog,
            _ => Action::Chat,
        }
    }
}

// == Run ==
/// Executes a chat request end to end and returns the model's text.
///
/// Issues exactly one model call per invocation. Fails with `ConfigError`
/// when no model endpoint is configured and `InvalidTag` when the action
/// needs a tag the request did not carry.
pub async fn run(
    clash: &CachedClient,
    model: Option<&ModelClient>,
    request: ChatRequest,
) -> Result<String> {
    let model = model.ok_or_else(|| {
        GatewayError::Config("AI model endpoint is not configured".to_string())
    })?;

    match Action::parse(request.action.as_deref()) {
        Action::AnalyzePlayer => {
            let tag = require_tag(request.player_tag.as_deref(), "Player tag is required")?;
            let player = clash.player(&tag).await?;
            let summary = to_json(&summarize_player(&player))?;
            analyze(model, player_prompt(&tag, &summary)).await
        }
        Action::AnalyzeClan => {
            let tag = require_tag(request.clan_tag.as_deref(), "Clan tag is required")?;
            let clan = clash.clan(&tag).await?;
            let summary = to_json(&summarize_clan(&clan))?;
            analyze(model, clan_prompt(&tag, &summary)).await
        }
        Action::AnalyzeCurrentWar => {
            let tag = require_tag(request.clan_tag.as_deref(), "Clan tag is required")?;
            let war = clash.current_war(&tag).await?;
            let summary = to_json(&summarize_war(&war))?;
            analyze(model, war_prompt(&tag, &summary)).await
        }
        Action::AnalyzeWarLog => {
            let tag = require_tag(request.clan_tag.as_deref(), "Clan tag is required")?;
            let log = clash.war_log(&tag, WAR_LOG_ANALYSIS_LIMIT).await?;
            analyze(model, war_log_prompt(&tag, &log.to_string())).await
        }
        Action::Chat => {
            let mut system = SYSTEM_PROMPT.to_string();
            if let Some(raw) = request.player_tag.as_deref() {
                if let Some(context) = player_context(clash, raw).await {
                    system.push(' ');
                    system.push_str(&context);
                }
            }
            model.complete(system, request.messages).await
        }
    }
}

fn require_tag(raw: Option<&str>, message: &str) -> Result<Tag> {
    match raw {
        Some(raw) => Tag::parse(raw),
        None => Err(GatewayError::InvalidTag(message.to_string())),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| GatewayError::Internal(format!("summary serialization failed: {e}")))
}

/// Sends a single scoped user message, discarding any prior history.
async fn analyze(model: &ModelClient, prompt: String) -> Result<String> {
    model
        .complete(
            SYSTEM_PROMPT.to_string(),
            vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        )
        .await
}

/// Builds the one-line player context for plain chat, best effort.
///
/// A failed lookup logs and returns None; chat must still work for a
/// player the gateway cannot currently fetch.
async fn player_context(clash: &CachedClient, raw_tag: &str) -> Option<String> {
    let tag = match Tag::parse(raw_tag) {
        Ok(tag) => tag,
        Err(e) => {
            warn!(raw_tag, error = %e, "skipping chat player context");
            return None;
        }
    };

    match clash.player(&tag).await {
        Ok(player) => {
            let name = player.get("name").and_then(Value::as_str)?.to_string();
            let level = player.get("expLevel").and_then(Value::as_u64)?;
            Some(format!(
                "You are advising the player {name} (level {level})."
            ))
        }
        Err(e) => {
            warn!(tag = %tag, error = %e, "skipping chat player context");
            None
        }
    }
}

// == Prompt Templates ==

fn player_prompt(tag: &Tag, summary_json: &str) -> String {
    format!(
        "Please analyze the player profile for {tag}. Include:\n\n\
         1. Profile overview (name, experience level, town hall level)\n\
         2. Trophy standing (current vs best)\n\
         3. War contribution (war stars, attack and defense wins)\n\
         4. Donation balance (given vs received)\n\
         5. Hero progression\n\
         6. Concrete upgrade and play-style recommendations\n\n\
         Player data:\n{summary_json}"
    )
}

fn clan_prompt(tag: &Tag, summary_json: &str) -> String {
    format!(
        "Please analyze the clan {tag}. Include:\n\n\
         1. Clan overview (name, level, member count)\n\
         2. Competitive standing (clan points, required trophies)\n\
         3. War record (wins, win streak, war frequency, war league)\n\
         4. Strengths and weaknesses suggested by these numbers\n\
         5. Recommendations for growth and recruitment\n\n\
         Clan data:\n{summary_json}"
    )
}

fn war_prompt(tag: &Tag, summary_json: &str) -> String {
    format!(
        "Please analyze the current clan war for clan {tag}. Include:\n\n\
         1. War overview (clan vs opponent, size, start/end time)\n\
         2. Current war status (preparation, in war, ended)\n\
         3. Current score comparison (stars and destruction percentage)\n\
         4. Attack statistics for both clans\n\
         5. Remaining attacks and potential maximum stars\n\
         6. Strategic recommendations based on the current situation\n\n\
         If the war is in preparation phase, focus on the matchup analysis \
         and strategic recommendations based on the lineup.\n\n\
         War data:\n{summary_json}"
    )
}

fn war_log_prompt(tag: &Tag, log_json: &str) -> String {
    format!(
        "Please analyze the recent war log for clan {tag}. Include:\n\n\
         1. Overall record across the listed wars\n\
         2. Performance trends (stars, destruction percentage)\n\
         3. Common opponents or war sizes worth noting\n\
         4. Recommendations to improve future war results\n\n\
         War log data:\n{log_json}"
    )
}
