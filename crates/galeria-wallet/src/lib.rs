//! Wallet and network gateway for the galeria NFT viewer.
//!
//! The browser injects a wallet object; this crate models that object as the
//! [`WalletProvider`] trait so it is always passed in explicitly and can be
//! replaced with a test double or a headless JSON-RPC transport. On top of
//! the provider, [`WalletGateway`] implements the connect/verify-network flow
//! the gallery needs: request accounts, read the active chain, switch to the
//! required chain (registering its definition with the wallet if unknown),
//! and subscribe to account/chain change notifications.

pub mod chain;
pub mod gateway;
pub mod provider;
pub mod rpc;

pub use chain::{chain_name, ChainDescriptor, ChainId, NativeCurrency};
pub use gateway::{Subscription, WalletError, WalletGateway};
pub use provider::{ProviderError, ProviderErrorKind, ProviderRequest, WalletProvider};
pub use rpc::HttpProvider;
