//! Text and JSON rendering of command results.

use anyhow::Result;
use dapp_config::NetworkDescriptor;
use dapp_core::TransactionRecord;
use dapp_history::PaginationInfo;
use dapp_wallets::ConnectionState;
use serde::Serialize;
use std::io::Write;

/// JSON shape of the `history` command
#[derive(Debug, Serialize)]
pub struct HistoryPage<'a> {
    pub transactions: &'a [TransactionRecord],
    pub pagination: PaginationInfo,
}

impl<'a> HistoryPage<'a> {
    pub fn new(transactions: &'a [TransactionRecord], pagination: PaginationInfo) -> Self {
        Self {
            transactions,
            pagination,
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_session(out: &mut dyn Write, state: &ConnectionState, symbol: &str) -> Result<()> {
    match &state.account {
        Some(account) if state.is_connected => {
            writeln!(out, "Account:  {}", account)?;
            writeln!(out, "Network:  {} ({})", state.network_name, state.chain_id)?;
            writeln!(out, "Balance:  {} {}", state.balance, symbol)?;
        }
        _ => writeln!(out, "Not connected")?,
    }
    Ok(())
}

pub fn print_networks(out: &mut dyn Write, networks: &[NetworkDescriptor]) -> Result<()> {
    for network in networks {
        writeln!(
            out,
            "{:<10} {:<10} {:<6} {}",
            network.chain_id,
            network.name,
            network.symbol,
            network.block_explorer_url.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn print_history(
    out: &mut dyn Write,
    transactions: &[TransactionRecord],
    info: &PaginationInfo,
    symbol: &str,
) -> Result<()> {
    if transactions.is_empty() {
        writeln!(out, "No transactions")?;
    }

    for tx in transactions {
        writeln!(
            out,
            "{}  {:<8}  {:>18} {:<5}  {:<42}  {:<9}  {}",
            tx.timestamp.format("%Y-%m-%d %H:%M"),
            tx.kind.to_string(),
            tx.amount,
            symbol,
            tx.counterparty,
            tx.status.to_string(),
            tx.hash
        )?;
    }

    writeln!(
        out,
        "Page {} of {} ({} of {} transactions)",
        info.current_page, info.total_pages, info.filtered_items, info.total_items
    )?;
    Ok(())
}
