//! Transaction source backed by Etherscan-compatible explorer APIs.

use crate::models::ExplorerResponse;
use async_trait::async_trait;
use dapp_config::{ExplorerConfig, NetworkCatalog, EXPLORER_PAGE_SIZE};
use dapp_core::{
    parse_decimal_quantity, Address, RawTransaction, SourceError, SourceResult, TransactionSource,
};
use num_bigint::BigUint;
use reqwest::Client;
use tracing::{debug, error, warn};
use url::Url;

/// Highest block passed to `txlist`, large enough to mean "latest"
const END_BLOCK: u64 = 99_999_999;

/// Explorer client holding one API endpoint per network name
pub struct ExplorerClient {
    http_client: Client,
    endpoints: Vec<(String, Url)>,
    api_key: Option<String>,
}

impl ExplorerClient {
    /// Uses the explorer API URL of every catalogued network that has one
    pub fn new(catalog: &NetworkCatalog, config: &ExplorerConfig) -> SourceResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SourceError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        let endpoints = catalog
            .iter()
            .filter_map(|network| {
                let raw = network.explorer_api_url.as_deref()?;
                match Url::parse(raw) {
                    Ok(url) => Some((network.name.clone(), url)),
                    Err(e) => {
                        warn!(network = %network.name, url = raw, "invalid explorer API url: {}", e);
                        None
                    }
                }
            })
            .collect();

        Ok(Self {
            http_client,
            endpoints,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }

    /// Adds or replaces the endpoint of `network`
    pub fn with_endpoint(mut self, network: &str, url: Url) -> Self {
        match self.endpoints.iter_mut().find(|(name, _)| name == network) {
            Some(entry) => entry.1 = url,
            None => self.endpoints.push((network.to_string(), url)),
        }
        self
    }

    fn endpoint(&self, network: &str) -> SourceResult<&Url> {
        self.endpoints
            .iter()
            .find(|(name, _)| name == network)
            .map(|(_, url)| url)
            .ok_or_else(|| SourceError::UnsupportedNetwork(network.to_string()))
    }

    fn account_url(&self, base: &Url, action: &str, address: &Address, extra: &[(&str, String)]) -> Url {
        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("module", "account")
                .append_pair("action", action)
                .append_pair("address", address.as_str());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        url
    }

    async fn get(&self, url: Url) -> SourceResult<ExplorerResponse> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Fetch(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Fetch(format!("explorer answered HTTP {}", status)));
        }

        response
            .json::<ExplorerResponse>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to read response: {}", e)))
    }

    /// Native balance of `address` on `network` in the smallest unit
    pub async fn fetch_balance(&self, address: &Address, network: &str) -> SourceResult<BigUint> {
        let base = self.endpoint(network)?;
        let url = self.account_url(base, "balance", address, &[("tag", "latest".to_string())]);

        let raw = self.get(url).await?.into_balance()?;
        parse_decimal_quantity(&raw)
            .ok_or_else(|| SourceError::InvalidResponse(format!("invalid balance '{}'", raw)))
    }
}

#[async_trait]
impl TransactionSource for ExplorerClient {
    fn supported_networks(&self) -> Vec<String> {
        self.endpoints.iter().map(|(name, _)| name.clone()).collect()
    }

    async fn fetch_transactions(
        &self,
        address: &Address,
        network: &str,
    ) -> SourceResult<Vec<RawTransaction>> {
        let base = self.endpoint(network)?;
        let url = self.account_url(
            base,
            "txlist",
            address,
            &[
                ("startblock", "0".to_string()),
                ("endblock", END_BLOCK.to_string()),
                ("page", "1".to_string()),
                ("offset", EXPLORER_PAGE_SIZE.to_string()),
                ("sort", "desc".to_string()),
            ],
        );

        debug!(address = %address, network, "requesting transaction list");
        let result = match self.get(url).await {
            Ok(response) => response.into_transactions(),
            Err(err) => Err(err),
        };

        match &result {
            Ok(transactions) => debug!(count = transactions.len(), network, "transaction list received"),
            Err(err) => error!(network, "Error fetching transactions: {}", err),
        }
        result
    }
}
