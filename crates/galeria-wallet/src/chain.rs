//! Chain identifiers and chain definitions.
//!
//! Wallets speak chain ids as 0x-prefixed hex strings (`"0x89"` for Polygon
//! mainnet); [`ChainId`] keeps the numeric value and converts at the edges.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainIdParseError {
    #[error("chain id is not 0x-prefixed hex: {0:?}")]
    MissingPrefix(String),
    #[error("chain id is not valid hex: {0:?}")]
    InvalidHex(String),
}

/// Numeric chain identifier, formatted as hex on the wallet boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    /// Polygon mainnet, where the gallery's collection lives.
    pub const POLYGON: Self = Self(137);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse the wallet-side form, e.g. `"0x89"`.
    pub fn from_hex(s: &str) -> Result<Self, ChainIdParseError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ChainIdParseError::MissingPrefix(s.to_owned()))?;
        let value = u64::from_str_radix(digits, 16)
            .map_err(|_| ChainIdParseError::InvalidHex(s.to_owned()))?;
        Ok(Self(value))
    }

    /// Format the wallet-side form, e.g. `"0x89"`.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Native currency of a chain, as `wallet_addEthereumChain` expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to register a chain it does not yet know.
///
/// Serializes to the `wallet_addEthereumChain` parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// The built-in definition for Polygon mainnet.
    pub fn polygon() -> Self {
        Self {
            chain_id: ChainId::POLYGON,
            chain_name: "Polygon Mainnet".to_owned(),
            native_currency: NativeCurrency {
                name: "MATIC".to_owned(),
                symbol: "MATIC".to_owned(),
                decimals: 18,
            },
            rpc_urls: vec!["https://polygon-rpc.com".to_owned()],
            block_explorer_urls: vec!["https://polygonscan.com".to_owned()],
        }
    }

    /// A bare definition built from a single RPC endpoint, for chains the
    /// crate has no built-in entry for.
    pub fn minimal(chain_id: ChainId, name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id,
            chain_name: name.into(),
            native_currency: NativeCurrency {
                name: "ETH".to_owned(),
                symbol: "ETH".to_owned(),
                decimals: 18,
            },
            rpc_urls: vec![rpc_url.into()],
            block_explorer_urls: Vec::new(),
        }
    }
}

/// Human-readable name for well-known chains.
pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "Ethereum Mainnet",
        5 => "Goerli Testnet",
        10 => "Optimism",
        56 => "BSC Mainnet",
        137 => "Polygon Mainnet",
        8453 => "Base",
        42161 => "Arbitrum One",
        43114 => "Avalanche",
        80001 => "Mumbai (Polygon)",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_hex_round_trip() {
        assert_eq!(ChainId::from_hex("0x89").unwrap(), ChainId::POLYGON);
        assert_eq!(ChainId::POLYGON.to_hex(), "0x89");
        assert_eq!(ChainId::new(1).to_hex(), "0x1");
    }

    #[test]
    fn chain_id_rejects_bare_decimal() {
        assert!(ChainId::from_hex("137").is_err());
        assert!(ChainId::from_hex("0xzz").is_err());
    }

    #[test]
    fn descriptor_serializes_to_wallet_param_shape() {
        let value = serde_json::to_value(ChainDescriptor::polygon()).unwrap();
        assert_eq!(value["chainId"], "0x89");
        assert_eq!(value["chainName"], "Polygon Mainnet");
        assert_eq!(value["nativeCurrency"]["symbol"], "MATIC");
        assert_eq!(value["rpcUrls"][0], "https://polygon-rpc.com");
        assert!(value["blockExplorerUrls"].is_array());
    }

    #[test]
    fn known_chain_names() {
        assert_eq!(chain_name(137), "Polygon Mainnet");
        assert_eq!(chain_name(999_999), "Unknown");
    }
}
