//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. The config is built once at startup and passed explicitly
//! into every component; nothing reads the environment after this point.

use std::env;
use std::path::PathBuf;

use crate::error::{GatewayError, Result};

// == Relay Target ==
/// Relay hop used when direct upstream access is blocked.
///
/// Both fields are mandatory together: a relay URL without a secret (or
/// the reverse) is a configuration error, never a silent default.
#[derive(Debug, Clone)]
pub struct RelayTarget {
    /// Full URL of the relay's forwarding endpoint
    pub url: String,
    /// Shared secret sent as the `x-relay-auth` header
    pub secret: String,
}

// == Model Config ==
/// Connection details for the OpenAI-compatible model endpoint.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL, e.g. `https://api.example.com/v1`
    pub base_url: String,
    /// Bearer credential
    pub api_key: String,
    /// Model name sent with every request
    pub model: String,
}

// == Gateway Config ==
/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Clash of Clans API base URL
    pub upstream_base: String,
    /// Clash of Clans API bearer token
    pub api_token: String,
    /// Optional relay hop for restricted networks
    pub relay: Option<RelayTarget>,
    /// Optional model endpoint; analysis actions fail without it
    pub model: Option<ModelConfig>,
    /// SQLite file for daily player-stat snapshots
    pub db_path: PathBuf,
    /// Directory served for unmatched paths, if any
    pub static_dir: Option<PathBuf>,
    /// Maximum number of cache entries
    pub max_cache_entries: usize,
    /// Background cache sweep interval in seconds
    pub cleanup_interval: u64,
}

const DEFAULT_UPSTREAM_BASE: &str = "https://api.clashofclans.com/v1";
const DEFAULT_MODEL: &str = "llama-3-8b-instruct";

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLASH_API_BASE` - upstream base URL (default: official API)
    /// - `CLASH_API_TOKEN` - upstream bearer token (required)
    /// - `CLASH_RELAY_URL` / `CLASH_RELAY_SECRET` - relay hop (both or neither)
    /// - `AI_API_URL` / `AI_API_KEY` / `AI_MODEL` - model endpoint (URL and
    ///   key both or neither)
    /// - `STATS_DB_PATH` - snapshot database path (default: stats.db)
    /// - `STATIC_DIR` - static asset directory (default: none)
    /// - `MAX_CACHE_ENTRIES` - cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 60)
    pub fn from_env() -> Result<Self> {
        let api_token = env::var("CLASH_API_TOKEN").map_err(|_| {
            GatewayError::Config("CLASH_API_TOKEN is not set".to_string())
        })?;

        let relay = match (
            env::var("CLASH_RELAY_URL").ok(),
            env::var("CLASH_RELAY_SECRET").ok(),
        ) {
            (Some(url), Some(secret)) => Some(RelayTarget { url, secret }),
            (None, None) => None,
            _ => {
                return Err(GatewayError::Config(
                    "CLASH_RELAY_URL and CLASH_RELAY_SECRET must be set together"
                        .to_string(),
                ))
            }
        };

        let model = match (env::var("AI_API_URL").ok(), env::var("AI_API_KEY").ok())
        {
            (Some(base_url), Some(api_key)) => Some(ModelConfig {
                base_url,
                api_key,
                model: env::var("AI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(GatewayError::Config(
                    "AI_API_URL and AI_API_KEY must be set together".to_string(),
                ))
            }
        };

        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            upstream_base: env::var("CLASH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE.to_string()),
            api_token,
            relay,
            model,
            db_path: env::var("STATS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("stats.db")),
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            max_cache_entries: env::var("MAX_CACHE_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}

// == Relay Config ==
/// Configuration for the stand-alone relay binary.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// HTTP listen port
    pub port: u16,
    /// Shared secret clients must present in `x-relay-auth`
    pub secret: String,
}

impl RelayConfig {
    /// Loads the relay configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `RELAY_PORT` - HTTP listen port (default: 3001)
    /// - `RELAY_SECRET` - shared secret (required)
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("RELAY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            secret: env::var("RELAY_SECRET").map_err(|_| {
                GatewayError::Config("RELAY_SECRET is not set".to_string())
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_gateway_env() {
        for key in [
            "SERVER_PORT",
            "CLASH_API_BASE",
            "CLASH_API_TOKEN",
            "CLASH_RELAY_URL",
            "CLASH_RELAY_SECRET",
            "AI_API_URL",
            "AI_API_KEY",
            "AI_MODEL",
            "STATS_DB_PATH",
            "STATIC_DIR",
            "MAX_CACHE_ENTRIES",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(key);
        }
    }

    // Environment variables are process-global, so the gateway-config
    // scenarios run inside one test to keep them from racing each other.
    #[test]
    fn test_config_from_env() {
        clear_gateway_env();

        // Missing token is fatal
        assert!(Config::from_env().is_err());

        // Defaults with only the token set
        env::set_var("CLASH_API_TOKEN", "token");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.upstream_base, DEFAULT_UPSTREAM_BASE);
        assert!(config.relay.is_none());
        assert!(config.model.is_none());
        assert_eq!(config.max_cache_entries, 10_000);
        assert_eq!(config.cleanup_interval, 60);

        // A relay URL without its secret is rejected, not defaulted
        env::set_var("CLASH_RELAY_URL", "http://relay.example/relay");
        assert!(Config::from_env().is_err());

        env::set_var("CLASH_RELAY_SECRET", "s3cret");
        let config = Config::from_env().unwrap();
        let relay = config.relay.expect("relay should be configured");
        assert_eq!(relay.url, "http://relay.example/relay");
        assert_eq!(relay.secret, "s3cret");

        clear_gateway_env();
    }

    #[test]
    fn test_relay_config_requires_secret() {
        env::remove_var("RELAY_SECRET");
        assert!(RelayConfig::from_env().is_err());
    }
}
