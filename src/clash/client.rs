//! Upstream HTTP client
//!
//! Authenticated access to the Clash of Clans API. When a relay hop is
//! configured the request goes to the relay instead, carrying the real
//! target URL as a query parameter and the shared secret in
//! `x-relay-auth`; the relay's status and body pass through unchanged.

use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::config::{Config, RelayTarget};
use crate::error::{GatewayError, Result};

// == Upstream Client ==
/// HTTP client for the Clash of Clans API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: Url,
    token: String,
    relay: Option<RelayTarget>,
}

impl UpstreamClient {
    /// Creates a client from the gateway configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.upstream_base).map_err(|e| {
            GatewayError::Config(format!("invalid CLASH_API_BASE: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::Config(
                "CLASH_API_BASE must be an http(s) URL".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: config.api_token.clone(),
            relay: config.relay.clone(),
        })
    }

    /// Builds the full upstream URL for a resource path.
    ///
    /// Path segments are percent-encoded here, which is what turns a
    /// canonical `#2PP` tag into `%232PP` on the wire.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    // == Fetch ==
    /// Fetches a JSON resource from the upstream API.
    ///
    /// Always sends the bearer credential. A non-2xx response (after the
    /// relay, if one is configured) becomes `GatewayError::Upstream` with
    /// the original status and body; it is never retried or translated.
    pub async fn fetch(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value> {
        let target = self.endpoint(segments, query);

        let request = match &self.relay {
            Some(RelayTarget { url, secret }) => self
                .http
                .get(url)
                .query(&[("url", target.as_str())])
                .header("x-relay-auth", secret),
            None => self.http.get(target),
        };

        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                GatewayError::Internal(format!("upstream request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::Internal(format!("upstream body read failed: {e}"))
        })?;

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::Internal(format!("upstream returned invalid JSON: {e}"))
        })
    }
}
