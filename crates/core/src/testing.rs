//! Scriptable collaborators for tests.
//!
//! Enabled with the `testing` feature so the wallet, history and facade
//! crates can drive the session store and pipeline without a real wallet or
//! block explorer.

use crate::error::{SourceError, SourceResult, WalletError, WalletResult};
use crate::notifier::Notifier;
use crate::provider::{ProviderEvent, WalletProvider};
use crate::source::TransactionSource;
use crate::types::{Address, RawTransaction};
use async_trait::async_trait;
use num_bigint::BigUint;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{broadcast, oneshot};

/// Wallet provider whose answers are set up by the test
pub struct MockWalletProvider {
    requested: Mutex<WalletResult<Vec<Address>>>,
    authorized: Mutex<WalletResult<Vec<Address>>>,
    chain_id: Mutex<WalletResult<String>>,
    balance_script: Mutex<VecDeque<WalletResult<BigUint>>>,
    default_balance: Mutex<BigUint>,
    balances: Mutex<HashMap<String, BigUint>>,
    codes: Mutex<HashMap<String, WalletResult<String>>>,
    unknown_chains: Mutex<Vec<String>>,
    switch_requests: Mutex<Vec<String>>,
    balance_calls: AtomicUsize,
    events: broadcast::Sender<ProviderEvent>,
}

impl MockWalletProvider {
    /// Provider on chain `0x1` with no accounts and a zero balance
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            requested: Mutex::new(Ok(Vec::new())),
            authorized: Mutex::new(Ok(Vec::new())),
            chain_id: Mutex::new(Ok("0x1".to_string())),
            balance_script: Mutex::new(VecDeque::new()),
            default_balance: Mutex::new(BigUint::default()),
            balances: Mutex::new(HashMap::new()),
            codes: Mutex::new(HashMap::new()),
            unknown_chains: Mutex::new(Vec::new()),
            switch_requests: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
            events,
        }
    }

    /// Uses `accounts` for both prompted and silent account requests
    pub fn with_accounts(self, accounts: &[&str]) -> Self {
        let accounts: Vec<Address> = accounts.iter().map(|a| Address::new(*a)).collect();
        *self.requested.lock() = Ok(accounts.clone());
        *self.authorized.lock() = Ok(accounts);
        self
    }

    pub fn with_chain_id(self, chain_id: &str) -> Self {
        *self.chain_id.lock() = Ok(chain_id.to_string());
        self
    }

    pub fn with_balance_wei(self, wei: u128) -> Self {
        *self.default_balance.lock() = BigUint::from(wei);
        self
    }

    pub fn set_requested_accounts(&self, result: WalletResult<Vec<Address>>) {
        *self.requested.lock() = result;
    }

    pub fn set_authorized_accounts(&self, result: WalletResult<Vec<Address>>) {
        *self.authorized.lock() = result;
    }

    pub fn set_chain_id(&self, result: WalletResult<String>) {
        *self.chain_id.lock() = result;
    }

    pub fn set_balance_wei(&self, wei: u128) {
        *self.default_balance.lock() = BigUint::from(wei);
    }

    /// Balance answered for `address` once the one-shot queue is empty
    pub fn set_balance_of(&self, address: &str, wei: u128) {
        self.balances
            .lock()
            .insert(address.to_ascii_lowercase(), BigUint::from(wei));
    }

    /// Bytecode answer for `address`; unknown addresses have no code
    pub fn set_code(&self, address: &str, result: WalletResult<String>) {
        self.codes.lock().insert(address.to_ascii_lowercase(), result);
    }

    /// Queues a one-shot balance answer, consumed before the default balance
    pub fn push_balance_result(&self, result: WalletResult<BigUint>) {
        self.balance_script.lock().push_back(result);
    }

    /// Makes `switch_chain` fail with `UnknownChain` for `chain_id`
    pub fn mark_unknown_chain(&self, chain_id: &str) {
        self.unknown_chains.lock().push(chain_id.to_string());
    }

    /// Emits a provider event, returning the number of receivers
    pub fn emit(&self, event: ProviderEvent) -> usize {
        self.events.send(event).unwrap_or(0)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn switch_requests(&self) -> Vec<String> {
        self.switch_requests.lock().clone()
    }
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.requested.lock().clone()
    }

    async fn authorized_accounts(&self) -> WalletResult<Vec<Address>> {
        self.authorized.lock().clone()
    }

    async fn chain_id(&self) -> WalletResult<String> {
        self.chain_id.lock().clone()
    }

    async fn balance(&self, address: &Address) -> WalletResult<BigUint> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.balance_script.lock().pop_front();
        if let Some(result) = scripted {
            return result;
        }
        let key = address.as_str().to_ascii_lowercase();
        if let Some(wei) = self.balances.lock().get(&key) {
            return Ok(wei.clone());
        }
        Ok(self.default_balance.lock().clone())
    }

    async fn code(&self, address: &Address) -> WalletResult<String> {
        let key = address.as_str().to_ascii_lowercase();
        self.codes
            .lock()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok("0x".to_string()))
    }

    async fn switch_chain(&self, chain_id: &str) -> WalletResult<()> {
        if self.unknown_chains.lock().iter().any(|id| id == chain_id) {
            return Err(WalletError::UnknownChain(chain_id.to_string()));
        }
        self.switch_requests.lock().push(chain_id.to_string());
        *self.chain_id.lock() = Ok(chain_id.to_string());
        let _ = self.events.send(ProviderEvent::ChainChanged(chain_id.to_string()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Transaction source with per-identity answers and optional gating.
///
/// While gating is on, every fetch parks until the test releases it, which
/// lets tests control the order in which concurrent fetches complete.
pub struct MockTransactionSource {
    networks: Vec<String>,
    responses: Mutex<HashMap<(String, String), SourceResult<Vec<RawTransaction>>>>,
    calls: Mutex<Vec<(Address, String)>>,
    gated: AtomicBool,
    parked: Mutex<VecDeque<oneshot::Sender<()>>>,
}

impl MockTransactionSource {
    pub fn new(networks: &[&str]) -> Self {
        Self {
            networks: networks.iter().map(|n| n.to_string()).collect(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gated: AtomicBool::new(false),
            parked: Mutex::new(VecDeque::new()),
        }
    }

    /// Sets the answer for `address` on `network`; unknown pairs return an empty list
    pub fn set_response(
        &self,
        address: &str,
        network: &str,
        result: SourceResult<Vec<RawTransaction>>,
    ) {
        self.responses
            .lock()
            .insert((address.to_ascii_lowercase(), network.to_string()), result);
    }

    pub fn set_gated(&self, gated: bool) {
        self.gated.store(gated, Ordering::SeqCst);
    }

    /// Number of fetches currently parked by the gate
    pub fn parked(&self) -> usize {
        self.parked.lock().len()
    }

    /// Releases the parked fetch at `index` (0 = oldest still parked)
    pub fn release(&self, index: usize) -> bool {
        let sender = self.parked.lock().remove(index);
        match sender {
            Some(sender) => sender.send(()).is_ok(),
            None => false,
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<(Address, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TransactionSource for MockTransactionSource {
    fn supported_networks(&self) -> Vec<String> {
        self.networks.clone()
    }

    async fn fetch_transactions(
        &self,
        address: &Address,
        network: &str,
    ) -> SourceResult<Vec<RawTransaction>> {
        self.calls.lock().push((address.clone(), network.to_string()));

        if !self.is_network_supported(network) {
            return Err(SourceError::UnsupportedNetwork(network.to_string()));
        }

        if self.gated.load(Ordering::SeqCst) {
            let (sender, receiver) = oneshot::channel();
            self.parked.lock().push_back(sender);
            let _ = receiver.await;
        }

        let key = (address.as_str().to_ascii_lowercase(), network.to_string());
        let response = self.responses.lock().get(&key).cloned();
        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Severity of a recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// Notifier that keeps every message for later assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.messages.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == NotificationKind::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show_success(&self, message: &str) {
        self.messages
            .lock()
            .push((NotificationKind::Success, message.to_string()));
    }

    fn show_info(&self, message: &str) {
        self.messages
            .lock()
            .push((NotificationKind::Info, message.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.messages
            .lock()
            .push((NotificationKind::Error, message.to_string()));
    }
}

/// Builds a raw explorer record with the fields the pipeline reads
pub fn raw_transaction(hash: &str, from: &str, to: &str, wei: &str, timestamp: u64) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value: wei.to_string(),
        time_stamp: timestamp.to_string(),
        block_number: "1".to_string(),
        receipt_status: "1".to_string(),
        is_error: "0".to_string(),
    }
}
