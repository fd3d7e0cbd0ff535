//! Read-only ERC-721 contract binding.
//!
//! Calls go through the injected [`WalletProvider`] as `eth_call`, the way
//! the browser page routed reads through the wallet's own connection. The
//! ABI surface is the minimal interface the gallery consumes.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use async_trait::async_trait;
use thiserror::Error;

use galeria_wallet::{ProviderError, ProviderRequest, WalletProvider};

sol! {
    interface IErc721 {
        function tokenURI(uint256 tokenId) external view returns (string);
        function ownerOf(uint256 tokenId) external view returns (address);
        function name() external view returns (string);
        function symbol() external view returns (string);
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("contract call failed: {0}")]
    Call(#[from] ProviderError),
    #[error("could not decode contract return: {0}")]
    Decode(String),
    #[error("contract returned an empty token URI")]
    EmptyUri,
}

/// The two read operations the resolver consumes.
#[async_trait]
pub trait TokenContract: Send + Sync {
    async fn token_uri(&self, token_id: u64) -> Result<String, ContractError>;
    async fn owner_of(&self, token_id: u64) -> Result<Address, ContractError>;
}

/// Collection-level `name()`/`symbol()`; contracts without them yield `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// ERC-721 binding for one contract address over an injected provider.
pub struct Erc721Contract<P> {
    provider: Arc<P>,
    address: Address,
}

impl<P: WalletProvider> Erc721Contract<P> {
    pub fn new(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    async fn eth_call(&self, calldata: Vec<u8>) -> Result<Vec<u8>, ContractError> {
        let request = ProviderRequest::Call {
            to: self.address.to_string(),
            data: format!("0x{}", hex::encode(calldata)),
        };
        let value = self.provider.request(request).await?;
        let body: String = serde_json::from_value(value)
            .map_err(|e| ContractError::Decode(format!("eth_call result is not a string: {e}")))?;
        hex::decode(body.trim_start_matches("0x"))
            .map_err(|e| ContractError::Decode(format!("eth_call result is not hex: {e}")))
    }

    async fn call_string(&self, calldata: Vec<u8>, what: &'static str) -> Option<String> {
        match self.eth_call(calldata).await {
            Ok(raw) => match <String as SolValue>::abi_decode(&raw, true) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!(
                        target: "galeria_metadata::contract",
                        contract = %self.address,
                        what,
                        error = %e,
                        "could not decode string return"
                    );
                    None
                }
            },
            Err(e) => {
                tracing::debug!(
                    target: "galeria_metadata::contract",
                    contract = %self.address,
                    what,
                    error = %e,
                    "string read failed"
                );
                None
            }
        }
    }

    /// Collection name and symbol; either read degrades to `None` on failure.
    pub async fn collection(&self) -> CollectionMetadata {
        let name = self.call_string(IErc721::nameCall {}.abi_encode(), "name").await;
        let symbol = self
            .call_string(IErc721::symbolCall {}.abi_encode(), "symbol")
            .await;
        CollectionMetadata { name, symbol }
    }
}

#[async_trait]
impl<P: WalletProvider> TokenContract for Erc721Contract<P> {
    async fn token_uri(&self, token_id: u64) -> Result<String, ContractError> {
        let call = IErc721::tokenURICall {
            tokenId: U256::from(token_id),
        };
        let raw = self.eth_call(call.abi_encode()).await?;
        let uri = IErc721::tokenURICall::abi_decode_returns(&raw, true)
            .map_err(|e| ContractError::Decode(e.to_string()))?
            ._0;
        if uri.is_empty() {
            return Err(ContractError::EmptyUri);
        }
        Ok(uri)
    }

    async fn owner_of(&self, token_id: u64) -> Result<Address, ContractError> {
        let call = IErc721::ownerOfCall {
            tokenId: U256::from(token_id),
        };
        let raw = self.eth_call(call.abi_encode()).await?;
        let owner = IErc721::ownerOfCall::abi_decode_returns(&raw, true)
            .map_err(|e| ContractError::Decode(e.to_string()))?
            ._0;
        Ok(owner)
    }
}
