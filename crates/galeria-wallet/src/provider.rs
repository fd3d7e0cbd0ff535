//! The injected wallet-provider seam.
//!
//! Browser wallets expose a `request({ method, params })` object and signal
//! failures through numeric codes on duck-typed error values. Here the
//! request surface is a typed enum and errors carry an explicit
//! [`ProviderErrorKind`] discriminant, so callers match on tags instead of
//! probing error shapes.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::chain::{ChainDescriptor, ChainId};

/// EIP-1193 error code for a request the user dismissed.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-1193 error code for a chain the wallet has no definition for.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// A wallet request, one variant per RPC method the gallery uses.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRequest {
    /// `eth_requestAccounts`
    RequestAccounts,
    /// `eth_chainId`
    ChainId,
    /// `eth_call` at the latest block; `data` is 0x-prefixed calldata.
    Call { to: String, data: String },
    /// `wallet_switchEthereumChain`
    SwitchChain(ChainId),
    /// `wallet_addEthereumChain`
    AddChain(ChainDescriptor),
}

/// Discriminant for provider failures, checked by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The user dismissed the request (code 4001).
    UserRejected,
    /// The wallet does not know the requested chain (code 4902); recoverable
    /// by registering the chain definition and switching again.
    UnrecognizedChain,
    /// The transport cannot serve this request at all, e.g. a headless RPC
    /// endpoint asked to switch chains.
    Unsupported,
    /// The request never reached the wallet.
    Transport,
    /// Any other JSON-RPC error, code preserved.
    Rpc(i64),
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    /// Tag a raw JSON-RPC error code.
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        let kind = match code {
            CODE_USER_REJECTED => ProviderErrorKind::UserRejected,
            CODE_UNRECOGNIZED_CHAIN => ProviderErrorKind::UnrecognizedChain,
            other => ProviderErrorKind::Rpc(other),
        };
        Self::new(kind, message)
    }
}

/// An EIP-1193-style wallet provider.
///
/// Implementations: the browser-injected wallet (out of scope here), the
/// headless [`crate::rpc::HttpProvider`], and scripted doubles in tests.
/// Always injected explicitly, never read from ambient state.
#[async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    async fn request(&self, request: ProviderRequest) -> Result<Value, ProviderError>;

    /// Account-change notifications; each event carries the new account list.
    fn accounts_stream(&self) -> broadcast::Receiver<Vec<String>>;

    /// Chain-change notifications.
    fn chain_stream(&self) -> broadcast::Receiver<ChainId>;
}
