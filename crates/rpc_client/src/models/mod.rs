//! Wire types for JSON-RPC and block explorer responses.

mod explorer_response;
mod rpc_request;
mod rpc_response;

pub use explorer_response::{ExplorerResponse, NO_TRANSACTIONS_FOUND};
pub use rpc_request::RpcRequest;
pub use rpc_response::{RpcResponse, RpcResponseError};
