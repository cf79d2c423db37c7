//! dapp-wallet Wallets Library
//!
//! This crate owns the wallet session state:
//! - the connected account, active network and balance
//! - connection, connecting and startup-check flags
//! - reactions to provider events (account switch, chain switch, disconnect)
//!
//! Every tracked field is an [`Observable`](dapp_core::Observable), so
//! subscribers (the transaction history pipeline, the UI) see each change
//! synchronously and in order.

mod connection_state;
mod store;

pub use connection_state::ConnectionState;
pub use store::ConnectionStore;

pub use dapp_core::{WalletError, WalletResult};
