//! Error types for the external collaborators.

use thiserror::Error;

/// Result type for wallet provider operations
pub type WalletResult<T> = std::result::Result<T, WalletError>;

/// Result type for transaction source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Wallet provider errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No wallet provider available")]
    ProviderUnavailable,

    #[error("No account selected")]
    NoAccountSelected,

    #[error("Chain {0} is not configured in the wallet provider")]
    UnknownChain(String),

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Transaction source errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Failed to fetch transactions: {0}")]
    Fetch(String),

    #[error("Invalid transaction source response: {0}")]
    InvalidResponse(String),
}
