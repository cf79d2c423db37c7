//! Wallet provider capability.

use crate::error::WalletResult;
use crate::types::Address;
use async_trait::async_trait;
use num_bigint::BigUint;
use tokio::sync::broadcast;

/// Events emitted by a wallet provider independently of any call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The authorized account list changed; empty means access was revoked
    AccountsChanged(Vec<Address>),
    /// The active chain changed to the given chain id
    ChainChanged(String),
    /// The provider lost its connection
    Disconnected,
}

/// EIP-1193 style wallet provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Requests account access, prompting the user if needed
    async fn request_accounts(&self) -> WalletResult<Vec<Address>>;

    /// Returns the already-authorized accounts without prompting
    async fn authorized_accounts(&self) -> WalletResult<Vec<Address>>;

    /// Active chain id as reported by the provider
    async fn chain_id(&self) -> WalletResult<String>;

    /// Balance of `address` in the smallest unit
    async fn balance(&self, address: &Address) -> WalletResult<BigUint>;

    /// Deployed bytecode at `address` as hex, `"0x"` when nothing is deployed
    async fn code(&self, address: &Address) -> WalletResult<String>;

    /// Asks the provider to switch its active chain.
    ///
    /// Fails with `WalletError::UnknownChain` when the chain is not
    /// configured in the provider.
    async fn switch_chain(&self, chain_id: &str) -> WalletResult<()>;

    /// Subscribes to provider events
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
