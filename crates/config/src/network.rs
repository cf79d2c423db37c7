//! Static network catalog.

use crate::UNKNOWN_NETWORK;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A network the wallet knows how to display and query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// Chain id as reported by the provider (hex, e.g. `0xaa36a7`)
    pub chain_id: String,
    /// Display name, also the key used by transaction sources
    pub name: String,
    /// Native currency symbol
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer_url: Option<String>,
    /// Base URL of an Etherscan-compatible API for this network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_api_url: Option<String>,
}

impl NetworkDescriptor {
    pub fn new(chain_id: &str, name: &str, symbol: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            rpc_url: None,
            block_explorer_url: None,
            explorer_api_url: None,
        }
    }

    pub fn with_block_explorer(mut self, url: &str) -> Self {
        self.block_explorer_url = Some(url.to_string());
        self
    }

    pub fn with_explorer_api(mut self, url: &str) -> Self {
        self.explorer_api_url = Some(url.to_string());
        self
    }

    pub fn with_rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = Some(url.to_string());
        self
    }

    /// Numeric value of the chain id, if it parses
    pub fn numeric_chain_id(&self) -> Option<u64> {
        parse_chain_id(&self.chain_id)
    }
}

impl fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.chain_id)
    }
}

/// Parses a chain id given either as `0x`-prefixed hex or as decimal.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None => trimmed.parse().ok(),
    }
}

/// Formats a chain id the way EIP-1193 providers report it.
pub fn format_chain_id(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

/// Lookup table from chain id to network descriptor.
///
/// Chain ids compare numerically, so `0xAA36A7`, `0xaa36a7` and `11155111`
/// all resolve to Sepolia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCatalog {
    networks: Vec<NetworkDescriptor>,
}

impl NetworkCatalog {
    pub fn new(networks: Vec<NetworkDescriptor>) -> Self {
        Self { networks }
    }

    /// The networks supported out of the box
    pub fn builtin() -> Self {
        Self::new(vec![
            NetworkDescriptor::new("0x1", "Ethereum", "ETH")
                .with_block_explorer("https://etherscan.io")
                .with_explorer_api("https://api.etherscan.io/api"),
            NetworkDescriptor::new("0xaa36a7", "Sepolia", "ETH")
                .with_block_explorer("https://sepolia.etherscan.io")
                .with_explorer_api("https://api-sepolia.etherscan.io/api"),
            NetworkDescriptor::new("0x5", "Goerli", "ETH")
                .with_block_explorer("https://goerli.etherscan.io")
                .with_explorer_api("https://api-goerli.etherscan.io/api"),
            NetworkDescriptor::new("0x4268", "Holesky", "ETH")
                .with_block_explorer("https://holesky.etherscan.io")
                .with_explorer_api("https://api-holesky.etherscan.io/api"),
            NetworkDescriptor::new("0x89", "Polygon", "MATIC")
                .with_block_explorer("https://polygonscan.com")
                .with_explorer_api("https://api.polygonscan.com/api"),
            NetworkDescriptor::new("0x13881", "Mumbai", "MATIC")
                .with_block_explorer("https://mumbai.polygonscan.com")
                .with_explorer_api("https://api-testnet.polygonscan.com/api"),
        ])
    }

    /// Looks a network up by chain id
    pub fn get(&self, chain_id: &str) -> Option<&NetworkDescriptor> {
        let wanted = parse_chain_id(chain_id)?;
        self.networks
            .iter()
            .find(|network| network.numeric_chain_id() == Some(wanted))
    }

    /// Looks a network up by display name, ignoring ASCII case
    pub fn by_name(&self, name: &str) -> Option<&NetworkDescriptor> {
        self.networks
            .iter()
            .find(|network| network.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a chain id to its display name, or [`UNKNOWN_NETWORK`].
    pub fn network_name(&self, chain_id: &str) -> &str {
        self.get(chain_id)
            .map(|network| network.name.as_str())
            .unwrap_or(UNKNOWN_NETWORK)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_id_formats() {
        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("0xAA36A7"), Some(11_155_111));
        assert_eq!(parse_chain_id(" 137 "), Some(137));
        assert_eq!(parse_chain_id("0x"), None);
        assert_eq!(parse_chain_id("mainnet"), None);
    }

    #[test]
    fn test_format_chain_id_round_trips() {
        assert_eq!(format_chain_id(11_155_111), "0xaa36a7");
        assert_eq!(parse_chain_id(&format_chain_id(0x4268)), Some(0x4268));
    }

    #[test]
    fn test_catalog_lookup_is_numeric() {
        let catalog = NetworkCatalog::builtin();
        assert_eq!(catalog.network_name("0xaa36a7"), "Sepolia");
        assert_eq!(catalog.network_name("0xAA36A7"), "Sepolia");
        assert_eq!(catalog.network_name("11155111"), "Sepolia");
        assert_eq!(catalog.network_name("0x89"), "Polygon");
    }

    #[test]
    fn test_unknown_chain_maps_to_placeholder() {
        let catalog = NetworkCatalog::builtin();
        assert_eq!(catalog.network_name("0x38"), UNKNOWN_NETWORK);
        assert_eq!(catalog.network_name(""), UNKNOWN_NETWORK);
        assert!(catalog.get("garbage").is_none());
    }

    #[test]
    fn test_by_name_ignores_case() {
        let catalog = NetworkCatalog::builtin();
        let holesky = catalog.by_name("holesky").expect("holesky is catalogued");
        assert_eq!(holesky.chain_id, "0x4268");
        assert!(catalog.contains_name("Mumbai"));
        assert!(!catalog.contains_name(UNKNOWN_NETWORK));
    }

    #[test]
    fn test_builtin_networks_have_explorer_apis() {
        let catalog = NetworkCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.iter().all(|n| n.explorer_api_url.is_some()));
    }
}
