//! League round resolver
//!
//! A league group pairs clans through per-round war tags; the upstream
//! API only exposes wars by tag, so finding "our war in round N" means
//! walking the round's tag list. The fetcher is injected so the walk can
//! be exercised without a network.

use std::future::Future;

use serde_json::Value;
use tracing::warn;

use crate::error::{GatewayError, Result};
use crate::tag::Tag;

/// Sentinel tag marking an unpaired slot in a round. Never dereferenced.
pub const UNPAIRED_WAR_TAG: &str = "#0";

// == Find Clan War In Round ==
/// Locates the war pairing `clan` within the 1-based `round` of `group`.
///
/// The scan is sequential with early exit on the first match. A war tag
/// that fails to fetch is logged and skipped rather than aborting the
/// search: pairings can reference wars that are not yet viewable, and one
/// bad tag must not hide the others.
///
/// # Errors
/// - `RoundNotFound` when the group has no round at that position
/// - `NoWarsInRound` when the round's war-tag list is missing or empty
/// - `WarNotFoundInRound` when no fetched war involves the clan
pub async fn find_clan_war_in_round<F, Fut>(
    group: &Value,
    clan: &Tag,
    round: u32,
    mut fetch_war: F,
) -> Result<Value>
where
    F: FnMut(Tag) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let round_index = round
        .checked_sub(1)
        .ok_or(GatewayError::RoundNotFound(round))? as usize;

    let rounds = group
        .get("rounds")
        .and_then(Value::as_array)
        .ok_or(GatewayError::RoundNotFound(round))?;

    let war_tags = rounds
        .get(round_index)
        .ok_or(GatewayError::RoundNotFound(round))?
        .get("warTags")
        .and_then(Value::as_array)
        .filter(|tags| !tags.is_empty())
        .ok_or(GatewayError::NoWarsInRound(round))?;

    for raw in war_tags {
        let Some(raw) = raw.as_str() else { continue };
        if raw == UNPAIRED_WAR_TAG {
            continue;
        }

        let war_tag = match Tag::parse(raw) {
            Ok(tag) => tag,
            Err(e) => {
                warn!(raw, error = %e, "skipping malformed war tag");
                continue;
            }
        };

        let war = match fetch_war(war_tag.clone()).await {
            Ok(war) => war,
            Err(e) => {
                // The pairing may reference a war that is not viewable yet.
                warn!(war_tag = %war_tag, error = %e, "skipping unfetchable war");
                continue;
            }
        };

        if involves_clan(&war, clan) {
            return Ok(war);
        }
    }

    Err(GatewayError::WarNotFoundInRound)
}

/// True when either side of the war record carries the clan's tag.
fn involves_clan(war: &Value, clan: &Tag) -> bool {
    ["clan", "opponent"].iter().any(|side| {
        war.get(side)
            .and_then(|s| s.get("tag"))
            .and_then(Value::as_str)
            .and_then(|raw| Tag::parse(raw).ok())
            .is_some_and(|tag| &tag == clan)
    })
}
