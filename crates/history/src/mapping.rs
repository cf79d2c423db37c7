//! Raw explorer records to account-relative transaction records.

use chrono::{TimeZone, Utc};
use dapp_config::{AMOUNT_DISPLAY_DECIMALS, NATIVE_DECIMALS};
use dapp_core::{
    format_units, parse_decimal_quantity, Address, RawTransaction, SourceError, SourceResult,
    TransactionKind, TransactionRecord, TransactionStatus,
};
use tracing::warn;

/// Receipt status the explorer reports for successful execution
const RECEIPT_SUCCESS: &str = "1";

/// Maps one raw record relative to `account`.
///
/// The record is `Sent` when its sender is `account` (compared without
/// regard to case) and `Received` otherwise.
pub fn map_transaction(
    raw: &RawTransaction,
    account: &Address,
    network: &str,
) -> SourceResult<TransactionRecord> {
    let value = parse_decimal_quantity(&raw.value).ok_or_else(|| {
        SourceError::InvalidResponse(format!("invalid value '{}' in {}", raw.value, raw.hash))
    })?;

    let seconds: i64 = raw.time_stamp.trim().parse().map_err(|_| {
        SourceError::InvalidResponse(format!(
            "invalid timestamp '{}' in {}",
            raw.time_stamp, raw.hash
        ))
    })?;
    let timestamp = Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
        SourceError::InvalidResponse(format!("timestamp {} out of range in {}", seconds, raw.hash))
    })?;

    let kind = if account.matches(&raw.from) {
        TransactionKind::Sent
    } else {
        TransactionKind::Received
    };
    let counterparty = match kind {
        TransactionKind::Sent => raw.to.clone(),
        TransactionKind::Received => raw.from.clone(),
    };
    let status = if raw.receipt_status == RECEIPT_SUCCESS {
        TransactionStatus::Completed
    } else {
        TransactionStatus::Failed
    };

    Ok(TransactionRecord {
        id: raw.hash.clone(),
        hash: raw.hash.clone(),
        kind,
        amount: format_units(&value, NATIVE_DECIMALS, AMOUNT_DISPLAY_DECIMALS),
        counterparty,
        from: raw.from.clone(),
        to: raw.to.clone(),
        timestamp,
        status,
        network: network.to_string(),
    })
}

/// Maps a raw list in source order, skipping records that cannot be mapped
pub fn map_transactions(
    raw: &[RawTransaction],
    account: &Address,
    network: &str,
) -> Vec<TransactionRecord> {
    raw.iter()
        .filter_map(|tx| match map_transaction(tx, account, network) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(hash = %tx.hash, "skipping transaction: {}", err);
                None
            }
        })
        .collect()
}
