//! dapp-wallet RPC Client Library
//!
//! Adapters that connect the session store and the history pipeline to
//! remote services:
//! - [`RpcClient`], a minimal JSON-RPC 2.0 client over HTTP
//! - [`JsonRpcProvider`], a [`WalletProvider`](dapp_core::WalletProvider)
//!   backed by an Ethereum JSON-RPC endpoint
//! - [`ExplorerClient`], a [`TransactionSource`](dapp_core::TransactionSource)
//!   backed by Etherscan-compatible block explorer APIs

mod explorer_client;
mod json_rpc_provider;
pub mod models;
mod rpc_client;
mod rpc_exception;

pub use explorer_client::ExplorerClient;
pub use json_rpc_provider::JsonRpcProvider;
pub use rpc_client::RpcClient;
pub use rpc_exception::RpcException;

// Re-export commonly used types
pub use models::{ExplorerResponse, RpcRequest, RpcResponse, RpcResponseError};
