//! Cache-aside getters
//!
//! Every upstream resource is read through here: check the cache, fetch
//! on miss, store with the TTL of its resource class. The cache layer
//! itself never refreshes anything; the discipline lives in the callers.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::clash::{resolver, UpstreamClient};
use crate::error::Result;
use crate::tag::Tag;

// == Resource Class ==
/// The kinds of upstream resource the gateway caches.
///
/// TTL is a property of the class, never of an individual request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Player,
    Clan,
    CurrentWar,
    WarLog,
    LeagueGroup,
    LeagueWar,
    CapitalRaids,
}

impl ResourceClass {
    /// Seconds a cached entry of this class stays fresh.
    pub const fn ttl_seconds(self) -> u64 {
        match self {
            ResourceClass::Player => 300,
            ResourceClass::Clan => 600,
            // wars are dynamic
            ResourceClass::CurrentWar => 120,
            ResourceClass::WarLog => 1800,
            ResourceClass::LeagueGroup => 3600,
            ResourceClass::LeagueWar => 3600,
            ResourceClass::CapitalRaids => 3600,
        }
    }

    /// Cache-key namespace for this class.
    pub const fn key_prefix(self) -> &'static str {
        match self {
            ResourceClass::Player => "player",
            ResourceClass::Clan => "clan",
            ResourceClass::CurrentWar => "war",
            ResourceClass::WarLog => "warlog",
            ResourceClass::LeagueGroup => "cwl",
            ResourceClass::LeagueWar => "cwlwar",
            ResourceClass::CapitalRaids => "raids",
        }
    }
}

// == Cached Client ==
/// Upstream client with cache-aside reads.
#[derive(Clone)]
pub struct CachedClient {
    upstream: UpstreamClient,
    cache: Arc<RwLock<CacheStore>>,
}

impl CachedClient {
    /// Creates a cached client over an upstream client and a shared store.
    pub fn new(upstream: UpstreamClient, cache: Arc<RwLock<CacheStore>>) -> Self {
        Self { upstream, cache }
    }

    /// Check-then-fetch-then-store.
    ///
    /// Cache failures are logged and swallowed on both sides of the fetch:
    /// an unusable cache degrades to always-miss behavior, never to a
    /// failed request.
    async fn fetch_cached(
        &self,
        class: ResourceClass,
        key: String,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value> {
        {
            let mut cache = self.cache.write().await;
            if let Some(value) = cache.get(&key) {
                debug!(key, "cache hit");
                return Ok(value);
            }
        }

        let value = self.upstream.fetch(segments, query).await?;

        {
            let mut cache = self.cache.write().await;
            if let Err(e) = cache.put(key.clone(), value.clone(), class.ttl_seconds())
            {
                warn!(key, error = %e, "cache write failed");
            }
        }

        Ok(value)
    }

    /// Player profile, cached for 5 minutes.
    pub async fn player(&self, tag: &Tag) -> Result<Value> {
        let key = format!("{}:{}", ResourceClass::Player.key_prefix(), tag);
        self.fetch_cached(
            ResourceClass::Player,
            key,
            &["players", tag.canonical()],
            &[],
        )
        .await
    }

    /// Clan profile, cached for 10 minutes.
    pub async fn clan(&self, tag: &Tag) -> Result<Value> {
        let key = format!("{}:{}", ResourceClass::Clan.key_prefix(), tag);
        self.fetch_cached(ResourceClass::Clan, key, &["clans", tag.canonical()], &[])
            .await
    }

    /// The clan's current war, cached for 2 minutes.
    pub async fn current_war(&self, tag: &Tag) -> Result<Value> {
        let key = format!("{}:{}", ResourceClass::CurrentWar.key_prefix(), tag);
        self.fetch_cached(
            ResourceClass::CurrentWar,
            key,
            &["clans", tag.canonical(), "currentwar"],
            &[],
        )
        .await
    }

    /// The clan's war log; the page limit is part of the cache key.
    pub async fn war_log(&self, tag: &Tag, limit: u32) -> Result<Value> {
        let key = format!(
            "{}:{}:{}",
            ResourceClass::WarLog.key_prefix(),
            tag,
            limit
        );
        self.fetch_cached(
            ResourceClass::WarLog,
            key,
            &["clans", tag.canonical(), "warlog"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// The clan's current league group.
    pub async fn league_group(&self, tag: &Tag) -> Result<Value> {
        let key = format!("{}:{}", ResourceClass::LeagueGroup.key_prefix(), tag);
        self.fetch_cached(
            ResourceClass::LeagueGroup,
            key,
            &["clans", tag.canonical(), "currentwar", "leaguegroup"],
            &[],
        )
        .await
    }

    /// A single league war by war tag.
    pub async fn league_war(&self, war_tag: &Tag) -> Result<Value> {
        let key = format!("{}:{}", ResourceClass::LeagueWar.key_prefix(), war_tag);
        self.fetch_cached(
            ResourceClass::LeagueWar,
            key,
            &["clanwarleagues", "wars", war_tag.canonical()],
            &[],
        )
        .await
    }

    /// Capital raid seasons; limit and cursors are part of the cache key.
    pub async fn capital_raids(
        &self,
        tag: &Tag,
        limit: u32,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Value> {
        let key = format!(
            "{}:{}:{}:{}:{}",
            ResourceClass::CapitalRaids.key_prefix(),
            tag,
            limit,
            before.unwrap_or(""),
            after.unwrap_or("")
        );

        let mut query = vec![("limit", limit.to_string())];
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        self.fetch_cached(
            ResourceClass::CapitalRaids,
            key,
            &["clans", tag.canonical(), "capitalraidseasons"],
            &query,
        )
        .await
    }

    /// Finds the war pairing `clan` within the given 1-based league round.
    pub async fn league_war_for_round(&self, clan: &Tag, round: u32) -> Result<Value> {
        let group = self.league_group(clan).await?;
        resolver::find_clan_war_in_round(&group, clan, round, |war_tag| async move {
            self.league_war(&war_tag).await
        })
        .await
    }
}
