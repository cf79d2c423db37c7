use dapp_core::WalletError;
use std::fmt;
use thiserror::Error;

/// Error raised by a JSON-RPC call, either by the endpoint or on the way to it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct RpcException {
    pub code: i64,
    pub message: String,
}

impl RpcException {
    /// The response body was not a JSON-RPC response
    pub const PARSE_ERROR: i64 = -32700;

    /// The request never produced a response
    pub const INTERNAL_ERROR: i64 = -32603;

    /// `wallet_switchEthereumChain` target is not configured in the wallet
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RpcException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl From<RpcException> for WalletError {
    fn from(err: RpcException) -> Self {
        match err.code {
            RpcException::PARSE_ERROR => WalletError::InvalidResponse(err.message),
            RpcException::INTERNAL_ERROR => WalletError::Transport(err.message),
            code => WalletError::Rpc {
                code,
                message: err.message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_wallet_error() {
        assert_eq!(
            WalletError::from(RpcException::new(RpcException::INTERNAL_ERROR, "HTTP error")),
            WalletError::Transport("HTTP error".to_string())
        );
        assert_eq!(
            WalletError::from(RpcException::new(RpcException::PARSE_ERROR, "bad json")),
            WalletError::InvalidResponse("bad json".to_string())
        );
        assert_eq!(
            WalletError::from(RpcException::new(4001, "User rejected the request.")),
            WalletError::Rpc {
                code: 4001,
                message: "User rejected the request.".to_string()
            }
        );
    }
}
