//! Clash of Clans API Module
//!
//! Upstream access in three layers: the raw authenticated HTTP client
//! (optionally routed through a relay hop), cache-aside getters keyed by
//! resource class, and the league-round war resolver built on top of them.

mod cached;
mod client;
pub mod resolver;

pub use cached::{CachedClient, ResourceClass};
pub use client::UpstreamClient;
