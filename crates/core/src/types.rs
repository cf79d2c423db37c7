//! Account and transaction data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallet account address as supplied by the provider.
///
/// The original casing is preserved for display; comparisons that decide
/// transaction direction use [`Address::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Case-insensitive comparison against another address string
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Direction of a transaction relative to the connected account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sent,
    Received,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Sent => write!(f, "sent"),
            TransactionKind::Received => write!(f, "received"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Transaction as returned by an Etherscan-compatible `txlist` endpoint.
///
/// Only the fields the history pipeline consumes are kept; numeric values
/// stay strings, exactly as the explorer encodes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    /// Empty for contract creations
    #[serde(default)]
    pub to: String,
    /// Value in the smallest unit, base 10
    pub value: String,
    /// Unix timestamp in seconds, base 10
    pub time_stamp: String,
    #[serde(default)]
    pub block_number: String,
    #[serde(default, rename = "txreceipt_status")]
    pub receipt_status: String,
    #[serde(default)]
    pub is_error: String,
}

/// Transaction mapped relative to the connected account. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub hash: String,
    pub kind: TransactionKind,
    /// Amount in native units, fixed decimals
    pub amount: String,
    /// The other party: recipient for sent, sender for received
    pub counterparty: String,
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_matches_ignores_case() {
        let address = Address::new("0xAbCdEf0000000000000000000000000000000001");
        assert!(address.matches("0xabcdef0000000000000000000000000000000001"));
        assert!(!address.matches("0xabcdef0000000000000000000000000000000002"));
        assert_eq!(address.to_string(), "0xAbCdEf0000000000000000000000000000000001");
    }

    #[test]
    fn test_blank_address_is_empty() {
        assert!(Address::default().is_empty());
        assert!(Address::new("   ").is_empty());
        assert!(!Address::new("0x1").is_empty());
    }

    #[test]
    fn test_raw_transaction_uses_explorer_field_names() {
        let raw: RawTransaction = serde_json::from_value(serde_json::json!({
            "blockNumber": "123",
            "timeStamp": "1700000000",
            "hash": "0xhash",
            "from": "0xfrom",
            "to": "0xto",
            "value": "1000",
            "isError": "0",
            "txreceipt_status": "1",
            "gasUsed": "21000"
        }))
        .unwrap();

        assert_eq!(raw.time_stamp, "1700000000");
        assert_eq!(raw.receipt_status, "1");
        assert_eq!(raw.block_number, "123");
        assert_eq!(raw.is_error, "0");
    }

    #[test]
    fn test_kind_and_status_display() {
        assert_eq!(TransactionKind::Sent.to_string(), "sent");
        assert_eq!(TransactionKind::Received.to_string(), "received");
        assert_eq!(TransactionStatus::Failed.to_string(), "failed");
    }
}
