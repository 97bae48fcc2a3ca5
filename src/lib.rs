//! Clash Gateway
//!
//! A gateway between client UIs and the Clash of Clans API: normalizes
//! tags, caches upstream responses per resource class, resolves league
//! wars by round, projects payloads into bounded summaries, and drives
//! one-shot model analysis. A stand-alone relay binary provides a trusted
//! forwarding hop for restricted networks.

pub mod ai;
pub mod api;
pub mod cache;
pub mod clash;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod relay;
pub mod summary;
pub mod tag;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::GatewayError;
pub use tasks::spawn_cleanup_task;
