//! Remote transaction history capability.

use crate::error::SourceResult;
use crate::types::{Address, RawTransaction};
use async_trait::async_trait;

/// Remote source of an account's transaction list, keyed by network name
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Names of the networks this source can serve
    fn supported_networks(&self) -> Vec<String>;

    fn is_network_supported(&self, network: &str) -> bool {
        self.supported_networks().iter().any(|name| name == network)
    }

    /// Fetches the raw transaction list for `address` on `network`
    async fn fetch_transactions(
        &self,
        address: &Address,
        network: &str,
    ) -> SourceResult<Vec<RawTransaction>>;
}
