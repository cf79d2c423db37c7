//! Wallet provider backed by an Ethereum JSON-RPC endpoint.

use crate::rpc_client::RpcClient;
use crate::rpc_exception::RpcException;
use async_trait::async_trait;
use dapp_core::{
    parse_hex_quantity, Address, ProviderEvent, WalletError, WalletProvider, WalletResult,
};
use num_bigint::BigUint;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{debug, info};
use url::Url;

/// Capacity of the provider event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// [`WalletProvider`] speaking the EIP-1193 method set over HTTP JSON-RPC.
///
/// An HTTP endpoint cannot push wallet events. The host injects them with
/// [`emit`](Self::emit); a successful chain switch emits `ChainChanged` on
/// its own.
pub struct JsonRpcProvider {
    client: RpcClient,
    events: broadcast::Sender<ProviderEvent>,
}

impl JsonRpcProvider {
    pub fn new(url: Url) -> WalletResult<Self> {
        let client = RpcClient::new(url)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: RpcClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { client, events }
    }

    pub fn endpoint(&self) -> &Url {
        self.client.base_address()
    }

    /// Publishes a provider event, returning the number of listeners reached
    pub fn emit(&self, event: ProviderEvent) -> usize {
        debug!(?event, "emitting provider event");
        self.events.send(event).unwrap_or(0)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> WalletResult<T> {
        let result = self.client.rpc_send_async(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            WalletError::InvalidResponse(format!("unexpected {} result: {}", method, e))
        })
    }

    async fn accounts(&self, method: &str) -> WalletResult<Vec<Address>> {
        let accounts: Vec<String> = self.call(method, Vec::new()).await?;
        Ok(accounts.into_iter().map(Address::from).collect())
    }
}

#[async_trait]
impl WalletProvider for JsonRpcProvider {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.accounts("eth_requestAccounts").await
    }

    async fn authorized_accounts(&self) -> WalletResult<Vec<Address>> {
        self.accounts("eth_accounts").await
    }

    async fn chain_id(&self) -> WalletResult<String> {
        self.call("eth_chainId", Vec::new()).await
    }

    async fn balance(&self, address: &Address) -> WalletResult<BigUint> {
        let raw: String = self
            .call("eth_getBalance", vec![json!(address.as_str()), json!("latest")])
            .await?;
        parse_hex_quantity(&raw)
            .ok_or_else(|| WalletError::InvalidResponse(format!("invalid balance quantity '{}'", raw)))
    }

    async fn code(&self, address: &Address) -> WalletResult<String> {
        self.call("eth_getCode", vec![json!(address.as_str()), json!("latest")])
            .await
    }

    async fn switch_chain(&self, chain_id: &str) -> WalletResult<()> {
        let params = vec![json!({ "chainId": chain_id })];
        match self
            .client
            .rpc_send_async("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => {
                info!(chain_id, "chain switch accepted");
                self.emit(ProviderEvent::ChainChanged(chain_id.to_string()));
                Ok(())
            }
            Err(err) if err.code == RpcException::UNRECOGNIZED_CHAIN => {
                Err(WalletError::UnknownChain(chain_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
