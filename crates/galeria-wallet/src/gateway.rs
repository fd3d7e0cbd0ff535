//! Connect/verify-network flow on top of a [`WalletProvider`].
//!
//! All operations are fire-and-report: failures come back as values for the
//! caller to show, nothing retries on its own.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::chain::{ChainDescriptor, ChainId};
use crate::provider::{ProviderError, ProviderErrorKind, ProviderRequest, WalletProvider};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("no wallet provider is available")]
    WalletUnavailable,
    #[error("wallet returned no accounts; is it unlocked?")]
    NoAccounts,
    /// The active chain differs from the required one and could not be
    /// switched; recoverable by re-running [`WalletGateway::ensure_chain`].
    #[error("wrong network: active {active}, required {required}")]
    WrongNetwork { active: ChainId, required: ChainId },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

type Result<T> = std::result::Result<T, WalletError>;

/// A change-notification handle. Dropping it unsubscribes; the owner decides
/// the scope (acquire on activation, release on deactivation).
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Next event, or `None` once the provider is gone.
    ///
    /// Missed events are skipped, not replayed: only the latest state matters
    /// to the gallery.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Gateway between the gallery and the (possibly absent) wallet.
pub struct WalletGateway<P> {
    provider: Option<Arc<P>>,
}

impl<P: WalletProvider> WalletGateway<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Build from whatever the host environment detected; `None` models a
    /// browser without an injected wallet.
    pub fn detect(provider: Option<Arc<P>>) -> Self {
        Self { provider }
    }

    /// True iff a provider is present. Side-effect-free.
    pub fn is_wallet_available(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<P>> {
        self.provider.as_ref().ok_or(WalletError::WalletUnavailable)
    }

    /// Request account access. Errors with [`WalletError::NoAccounts`] when
    /// the wallet answers with an empty list.
    pub async fn request_accounts(&self) -> Result<Vec<String>> {
        let value = self
            .provider()?
            .request(ProviderRequest::RequestAccounts)
            .await?;
        let accounts: Vec<String> = serde_json::from_value(value)
            .map_err(|e| ProviderError::transport(format!("malformed accounts response: {e}")))?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        tracing::debug!(
            target: "galeria_wallet::gateway",
            account = %accounts[0],
            count = accounts.len(),
            "wallet connected"
        );
        Ok(accounts)
    }

    /// Read the wallet's active chain.
    pub async fn active_chain(&self) -> Result<ChainId> {
        let value = self.provider()?.request(ProviderRequest::ChainId).await?;
        let hex: String = serde_json::from_value(value)
            .map_err(|e| ProviderError::transport(format!("malformed chain id response: {e}")))?;
        let chain = ChainId::from_hex(&hex)
            .map_err(|e| ProviderError::transport(e.to_string()))?;
        Ok(chain)
    }

    /// Make sure the wallet is on `required`.
    ///
    /// Already there: `Ok(true)` without issuing any switch or add-chain
    /// request. Otherwise ask for a switch; when the wallet does not know the
    /// chain, register `descriptor` and switch again. `Ok(false)` when the
    /// user rejects or a step fails — the caller re-triggers manually.
    pub async fn ensure_chain(
        &self,
        required: ChainId,
        descriptor: &ChainDescriptor,
    ) -> Result<bool> {
        let provider = self.provider()?;

        let active = self.active_chain().await?;
        if active == required {
            return Ok(true);
        }
        tracing::info!(
            target: "galeria_wallet::gateway",
            active = %active,
            required = %required,
            "wrong network, requesting switch"
        );

        match provider.request(ProviderRequest::SwitchChain(required)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind == ProviderErrorKind::UnrecognizedChain => {
                if let Err(add_err) = provider
                    .request(ProviderRequest::AddChain(descriptor.clone()))
                    .await
                {
                    tracing::warn!(
                        target: "galeria_wallet::gateway",
                        error = %add_err,
                        chain = %required,
                        "failed to register chain with wallet"
                    );
                    return Ok(false);
                }
                match provider.request(ProviderRequest::SwitchChain(required)).await {
                    Ok(_) => Ok(true),
                    Err(switch_err) => {
                        tracing::warn!(
                            target: "galeria_wallet::gateway",
                            error = %switch_err,
                            chain = %required,
                            "switch failed after registering chain"
                        );
                        Ok(false)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "galeria_wallet::gateway",
                    error = %e,
                    chain = %required,
                    "chain switch rejected"
                );
                Ok(false)
            }
        }
    }

    /// Subscribe to account changes.
    pub fn subscribe_accounts(&self) -> Result<Subscription<Vec<String>>> {
        Ok(Subscription {
            rx: self.provider()?.accounts_stream(),
        })
    }

    /// Subscribe to chain changes.
    pub fn subscribe_chain(&self) -> Result<Subscription<ChainId>> {
        Ok(Subscription {
            rx: self.provider()?.chain_stream(),
        })
    }
}
