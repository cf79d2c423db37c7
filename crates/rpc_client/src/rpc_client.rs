use crate::models::{RpcRequest, RpcResponse};
use crate::rpc_exception::RpcException;
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;
use url::Url;

/// JSON-RPC 2.0 client over HTTP POST
pub struct RpcClient {
    base_address: Url,
    http_client: Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: Url) -> Result<Self, RpcException> {
        let http_client = Client::builder().build().map_err(|e| {
            RpcException::new(
                RpcException::INTERNAL_ERROR,
                format!("Failed to build HTTP client: {}", e),
            )
        })?;
        Ok(Self::with_client(http_client, url))
    }

    /// Creates a client that shares an existing HTTP client
    pub fn with_client(client: Client, url: Url) -> Self {
        Self {
            base_address: url,
            http_client: client,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    fn as_rpc_request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        RpcRequest::new(id, method, params)
    }

    fn as_rpc_response(content: &str) -> Result<RpcResponse, RpcException> {
        let response: RpcResponse = serde_json::from_str(content).map_err(|e| {
            RpcException::new(RpcException::PARSE_ERROR, format!("Parse error: {}", e))
        })?;

        match response.error {
            Some(ref error) => Err(RpcException::new(error.code, error.message.clone())),
            None => Ok(response),
        }
    }

    /// Sends `request` and returns the decoded response
    pub async fn send_async(&self, request: RpcRequest) -> Result<RpcResponse, RpcException> {
        trace!(method = %request.method, id = request.id, "sending rpc request");

        let response = self
            .http_client
            .post(self.base_address.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                RpcException::new(RpcException::INTERNAL_ERROR, format!("HTTP error: {}", e))
            })?;

        let content = response.text().await.map_err(|e| {
            RpcException::new(
                RpcException::INTERNAL_ERROR,
                format!("Failed to read response: {}", e),
            )
        })?;

        Self::as_rpc_response(&content)
    }

    /// Calls `method` and returns its result, `Value::Null` when the result is empty
    pub async fn rpc_send_async(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcException> {
        let request = self.as_rpc_request(method, params);
        let response = self.send_async(request).await?;
        Ok(response.result.unwrap_or(Value::Null))
    }
}
