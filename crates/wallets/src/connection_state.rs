use dapp_config::{EMPTY_BALANCE, UNKNOWN_NETWORK};
use dapp_core::Address;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the wallet session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub account: Option<Address>,
    pub chain_id: String,
    pub network_name: String,
    /// Balance in native units, fixed decimals
    pub balance: String,
    pub is_connected: bool,
    pub is_connecting: bool,
}

impl ConnectionState {
    /// `is_connected` requires an account; no account requires a zero
    /// balance and a disconnected session.
    pub fn is_consistent(&self) -> bool {
        let has_account = self.account.as_ref().is_some_and(|a| !a.is_empty());
        if self.is_connected && !has_account {
            return false;
        }
        if !has_account && (self.balance != EMPTY_BALANCE || self.is_connected) {
            return false;
        }
        true
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            account: None,
            chain_id: String::new(),
            network_name: UNKNOWN_NETWORK.to_string(),
            balance: EMPTY_BALANCE.to_string(),
            is_connected: false,
            is_connecting: false,
        }
    }
}
