//! Headless [`WalletProvider`] over plain HTTP JSON-RPC.
//!
//! Serves the read-only subset a gallery needs (`eth_chainId`, `eth_call`,
//! `eth_accounts`). Chain management needs an interactive wallet, so
//! switch/add requests come back [`ProviderErrorKind::Unsupported`]. The
//! endpoint never changes chain or accounts, so the notification streams
//! stay silent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::chain::ChainId;
use crate::provider::{ProviderError, ProviderErrorKind, ProviderRequest, WalletProvider};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_BUFFER: usize = 16;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    accounts_tx: broadcast::Sender<Vec<String>>,
    chain_tx: broadcast::Sender<ChainId>,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::transport(e.to_string()))?;
        let (accounts_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (chain_tx, _) = broadcast::channel(EVENT_BUFFER);
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
            accounts_tx,
            chain_tx,
        })
    }

    async fn call_rpc(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ProviderError::transport(format!(
                "rpc endpoint answered {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(format!("malformed rpc response: {e}")))?;
        if let Some(err) = body.error {
            tracing::debug!(
                target: "galeria_wallet::rpc",
                method,
                code = err.code,
                message = %err.message,
                "rpc error"
            );
            return Err(ProviderError::from_code(err.code, err.message));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, request: ProviderRequest) -> Result<Value, ProviderError> {
        match request {
            ProviderRequest::ChainId => self.call_rpc("eth_chainId", json!([])).await,
            // No user to prompt; eth_accounts reports whatever the node manages.
            ProviderRequest::RequestAccounts => self.call_rpc("eth_accounts", json!([])).await,
            ProviderRequest::Call { to, data } => {
                self.call_rpc("eth_call", json!([{ "to": to, "data": data }, "latest"]))
                    .await
            }
            ProviderRequest::SwitchChain(_) | ProviderRequest::AddChain(_) => {
                Err(ProviderError::new(
                    ProviderErrorKind::Unsupported,
                    "chain management requires an interactive wallet",
                ))
            }
        }
    }

    fn accounts_stream(&self) -> broadcast::Receiver<Vec<String>> {
        self.accounts_tx.subscribe()
    }

    fn chain_stream(&self) -> broadcast::Receiver<ChainId> {
        self.chain_tx.subscribe()
    }
}
