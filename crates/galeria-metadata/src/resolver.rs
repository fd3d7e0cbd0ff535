//! The resolve/normalize/fetch/merge pipeline.
//!
//! Per token: read the contract URI, rewrite it to a fetchable address,
//! GET the JSON document, normalize the payload's image, merge. Any failure
//! along the way degrades that one token to a placeholder record; a batch
//! settles every resolution and reports outcomes positionally.

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::contract::{ContractError, TokenContract};
use crate::record::MetadataRecord;
use crate::uri::normalize_token_uri;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300?text=NFT";

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Image substituted whenever a token has no fetchable image.
    pub placeholder_image: String,
    /// Upper bound on each metadata fetch. The original client had none and
    /// a hung fetch hung that token forever; the bound is a safety margin.
    /// `None` restores the unbounded behavior.
    pub fetch_timeout: Option<Duration>,
    /// Probe `ownerOf` before reading the URI. When the probe fails the
    /// token is reported as missing instead of degraded to a placeholder.
    pub probe_ownership: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            probe_ownership: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The ownership probe failed; the token likely does not exist.
    #[error("token {token_id} not found")]
    TokenNotFound {
        token_id: u64,
        #[source]
        source: ContractError,
    },
}

pub struct MetadataResolver<C> {
    contract: C,
    client: reqwest::Client,
    config: ResolverConfig,
}

impl<C: TokenContract> MetadataResolver<C> {
    pub fn new(contract: C) -> Self {
        Self::with_config(contract, ResolverConfig::default())
    }

    pub fn with_config(contract: C, config: ResolverConfig) -> Self {
        Self {
            contract,
            client: reqwest::Client::new(),
            config,
        }
    }

    pub const fn contract(&self) -> &C {
        &self.contract
    }

    /// Resolve one token to a display-ready record.
    ///
    /// Contract or fetch failures produce the fallback record, not an error.
    /// The only error is [`ResolveError::TokenNotFound`], and only with
    /// `probe_ownership` on.
    pub async fn resolve_one(&self, token_id: u64) -> Result<MetadataRecord, ResolveError> {
        if self.config.probe_ownership {
            if let Err(source) = self.contract.owner_of(token_id).await {
                tracing::debug!(
                    target: "galeria_metadata::resolver",
                    token_id,
                    error = %source,
                    "ownership probe failed"
                );
                return Err(ResolveError::TokenNotFound { token_id, source });
            }
        }

        let uri = match self.contract.token_uri(token_id).await {
            Ok(uri) => uri,
            Err(e) => {
                tracing::debug!(
                    target: "galeria_metadata::resolver",
                    token_id,
                    error = %e,
                    "token URI read failed, falling back"
                );
                return Ok(self.fallback(token_id));
            }
        };

        let Some(url) = normalize_token_uri(&uri) else {
            tracing::debug!(
                target: "galeria_metadata::resolver",
                token_id,
                uri = %uri,
                "non-fetchable token URI, falling back"
            );
            return Ok(self.fallback(token_id));
        };

        let Some(payload) = self.fetch_json(&url).await else {
            return Ok(self.fallback(token_id));
        };

        let image = payload
            .get("image")
            .and_then(Value::as_str)
            .and_then(normalize_token_uri)
            .unwrap_or_else(|| self.config.placeholder_image.clone());

        tracing::debug!(
            target: "galeria_metadata::resolver",
            token_id,
            url = %url,
            "resolved metadata"
        );
        Ok(MetadataRecord::from_payload(token_id, payload, image))
    }

    /// Resolve a batch concurrently, settle-all.
    ///
    /// Outcomes align positionally with `token_ids`; one token's failure
    /// never aborts its siblings. Total latency is bounded by the slowest
    /// resolution, not the sum.
    pub async fn resolve_many(
        &self,
        token_ids: &[u64],
    ) -> Vec<Result<MetadataRecord, ResolveError>> {
        futures::future::join_all(token_ids.iter().map(|&id| self.resolve_one(id))).await
    }

    async fn fetch_json(&self, url: &str) -> Option<Map<String, Value>> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.config.fetch_timeout {
            request = request.timeout(timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    target: "galeria_metadata::resolver",
                    url = %url,
                    error = %e,
                    "metadata fetch failed"
                );
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(
                target: "galeria_metadata::resolver",
                url = %url,
                status = %response.status(),
                "metadata fetch answered non-success"
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(Value::Object(payload)) => Some(payload),
            Ok(_) => {
                tracing::debug!(
                    target: "galeria_metadata::resolver",
                    url = %url,
                    "metadata body is not a JSON object"
                );
                None
            }
            Err(e) => {
                tracing::debug!(
                    target: "galeria_metadata::resolver",
                    url = %url,
                    error = %e,
                    "metadata body is not valid JSON"
                );
                None
            }
        }
    }

    fn fallback(&self, token_id: u64) -> MetadataRecord {
        MetadataRecord::fallback(token_id, &self.config.placeholder_image)
    }
}
