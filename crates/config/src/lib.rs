//! dapp-wallet Configuration Module
//!
//! This module provides the static network catalog, the timing and display
//! constants shared by the session store and the history pipeline, and the
//! TOML-backed application configuration.

mod app_config;
mod network;

pub use app_config::{
    AppConfig, ConfigError, ConfigResult, ExplorerConfig, HistoryConfig, SessionConfig,
    StorageConfig,
};
pub use network::{format_chain_id, parse_chain_id, NetworkCatalog, NetworkDescriptor};

/// Placeholder network name for chain ids missing from the catalog
pub const UNKNOWN_NETWORK: &str = "Unknown";

/// Decimals of the native currency on every catalogued network
pub const NATIVE_DECIMALS: u32 = 18;

/// Decimals shown for account balances
pub const BALANCE_DISPLAY_DECIMALS: u32 = 4;

/// Decimals shown for transaction amounts
pub const AMOUNT_DISPLAY_DECIMALS: u32 = 6;

/// Balance shown while no account is connected
pub const EMPTY_BALANCE: &str = "0";

/// Length of a `0x`-prefixed account or contract address
pub const ADDRESS_LENGTH: usize = 42;

/// Debounce window applied to (account, network) identity changes
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Total balance fetch attempts before keeping the stale value
pub const MAX_BALANCE_ATTEMPTS: u32 = 3;

/// Fixed delay between balance fetch attempts
pub const BALANCE_RETRY_DELAY_MS: u64 = 500;

/// Provider settling time after a chain switch
pub const CHAIN_SETTLE_DELAY_MS: u64 = 1000;

/// Default transaction history page size
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Number of records requested from the block explorer per fetch
pub const EXPLORER_PAGE_SIZE: u32 = 100;

/// Timeout applied to block explorer requests
pub const EXPLORER_TIMEOUT_SECS: u64 = 30;
