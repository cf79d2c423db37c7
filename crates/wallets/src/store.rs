//! Wallet connection state store.

use crate::connection_state::ConnectionState;
use dapp_config::{
    NetworkCatalog, NetworkDescriptor, SessionConfig, ADDRESS_LENGTH, AMOUNT_DISPLAY_DECIMALS,
    BALANCE_DISPLAY_DECIMALS, EMPTY_BALANCE, NATIVE_DECIMALS, UNKNOWN_NETWORK,
};
use dapp_core::{
    format_units, Address, ConnectionPersistence, Observable, ProviderEvent, WalletError,
    WalletProvider, WalletResult,
};
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Owns the wallet session and keeps its fields coherent.
///
/// One instance lives for the whole process and is shared behind an `Arc`.
/// All fields are mutated only by the store's own operations and provider
/// event handlers; everything else reads them through the exposed holders.
///
/// Updates that span several holders, or that check one holder before
/// setting another, run under a session lock so concurrent operations never
/// interleave their writes. The lock is never held across an `.await`.
pub struct ConnectionStore {
    provider: Option<Arc<dyn WalletProvider>>,
    persistence: Arc<dyn ConnectionPersistence>,
    catalog: NetworkCatalog,
    config: SessionConfig,

    account: Observable<Option<Address>>,
    chain_id: Observable<String>,
    network: Observable<String>,
    balance: Observable<String>,
    is_connected: Observable<bool>,
    is_connecting: Observable<bool>,
    is_checking_connection: Observable<bool>,
    contract_address: Observable<Option<Address>>,
    contract_balance: Observable<String>,

    session: ReentrantMutex<()>,
}

impl ConnectionStore {
    /// Creates a store in the disconnected state
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        persistence: Arc<dyn ConnectionPersistence>,
        catalog: NetworkCatalog,
        config: SessionConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            persistence,
            catalog,
            config,
            account: Observable::new(None),
            chain_id: Observable::new(String::new()),
            network: Observable::new(UNKNOWN_NETWORK.to_string()),
            balance: Observable::new(EMPTY_BALANCE.to_string()),
            is_connected: Observable::new(false),
            is_connecting: Observable::new(false),
            is_checking_connection: Observable::new(false),
            contract_address: Observable::new(None),
            contract_balance: Observable::new(EMPTY_BALANCE.to_string()),
            session: ReentrantMutex::new(()),
        })
    }

    pub fn account(&self) -> &Observable<Option<Address>> {
        &self.account
    }

    pub fn chain_id(&self) -> &Observable<String> {
        &self.chain_id
    }

    /// Display name of the active network, `"Unknown"` when not catalogued
    pub fn network(&self) -> &Observable<String> {
        &self.network
    }

    pub fn balance(&self) -> &Observable<String> {
        &self.balance
    }

    pub fn is_connected(&self) -> &Observable<bool> {
        &self.is_connected
    }

    pub fn is_connecting(&self) -> &Observable<bool> {
        &self.is_connecting
    }

    pub fn is_checking_connection(&self) -> &Observable<bool> {
        &self.is_checking_connection
    }

    /// Contract whose balance is followed, if any
    pub fn contract_address(&self) -> &Observable<Option<Address>> {
        &self.contract_address
    }

    pub fn contract_balance(&self) -> &Observable<String> {
        &self.contract_balance
    }

    pub fn catalog(&self) -> &NetworkCatalog {
        &self.catalog
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Catalog entry for the active chain, if it is known
    pub fn network_descriptor(&self) -> Option<NetworkDescriptor> {
        self.catalog.get(&self.chain_id.get()).cloned()
    }

    /// Current values of all session fields
    pub fn snapshot(&self) -> ConnectionState {
        ConnectionState {
            account: self.account.get(),
            chain_id: self.chain_id.get(),
            network_name: self.network.get(),
            balance: self.balance.get(),
            is_connected: self.is_connected.get(),
            is_connecting: self.is_connecting.get(),
        }
    }

    /// Requests account access and establishes the session.
    ///
    /// On failure the store is reset to the disconnected state, the
    /// persisted connection flag is cleared and the error is returned.
    pub async fn connect(&self) -> WalletResult<Address> {
        let result = match self.provider.clone() {
            Some(provider) => {
                self.is_connecting.set(true);
                let result = self.establish(provider.as_ref()).await;
                self.is_connecting.set(false);
                result
            }
            None => Err(WalletError::ProviderUnavailable),
        };

        if let Err(err) = &result {
            error!("Error connecting wallet: {}", err);
            self.reset_state();
            self.persistence.set_previously_connected(false);
        }

        result
    }

    async fn establish(&self, provider: &dyn WalletProvider) -> WalletResult<Address> {
        let accounts = provider.request_accounts().await?;
        let account = first_account(accounts).ok_or(WalletError::NoAccountSelected)?;

        let chain_id = provider.chain_id().await?;
        {
            let _session = self.session.lock();
            self.apply_network(&chain_id);
            self.account.set(Some(account.clone()));
            self.is_connected.set(true);
        }
        self.persistence.set_previously_connected(true);
        info!(account = %account, network = %self.network.get(), "wallet connected");

        self.refresh_balance_for(&account).await;
        Ok(account)
    }

    /// Resets the session to its defaults and forgets the persisted flag.
    pub fn disconnect(&self) {
        self.reset_state();
        self.persistence.set_previously_connected(false);
        info!("wallet disconnected");
    }

    /// Ordered so that every intermediate state satisfies the session invariants
    fn reset_state(&self) {
        let _session = self.session.lock();
        self.is_connected.set(false);
        self.balance.set(EMPTY_BALANCE.to_string());
        self.account.set(None);
        self.contract_balance.set(EMPTY_BALANCE.to_string());
        self.contract_address.set(None);
        self.chain_id.set(String::new());
        self.network.set(UNKNOWN_NETWORK.to_string());
    }

    /// Asks the provider to switch chains.
    ///
    /// Success only means the request was accepted; the store's network
    /// fields change when the provider reports the chain change.
    pub async fn switch_network(&self, chain_id: &str) -> WalletResult<()> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(WalletError::ProviderUnavailable)?;

        info!(chain_id, "switching network");
        provider.switch_chain(chain_id).await.map_err(|err| {
            error!(chain_id, "Error switching network: {}", err);
            err
        })
    }

    /// Re-fetches the balance of the current account, if any
    pub async fn refresh_balance(&self) {
        match self.account.get() {
            Some(account) => self.refresh_balance_for(&account).await,
            None => debug!("no account available to refresh balance"),
        }
    }

    /// Fetches and publishes the balance of `account`.
    ///
    /// Retries with a fixed delay; when every attempt fails the previous
    /// balance stays published.
    async fn refresh_balance_for(&self, account: &Address) {
        let Some(provider) = self.provider.as_ref() else {
            debug!("no provider available to update balance");
            return;
        };

        let attempts = self.config.balance_attempts.max(1);
        for attempt in 1..=attempts {
            match provider.balance(account).await {
                Ok(raw) => {
                    let formatted = format_units(&raw, NATIVE_DECIMALS, BALANCE_DISPLAY_DECIMALS);
                    let _session = self.session.lock();
                    if self.account.get().as_ref() != Some(account) {
                        debug!(account = %account, "discarding balance of a previous account");
                        return;
                    }
                    debug!(account = %account, balance = %formatted, "balance fetched");
                    self.balance.set(formatted);
                    return;
                }
                Err(err) => {
                    warn!(account = %account, attempt, "Error fetching balance: {}", err);
                    if attempt < attempts {
                        sleep(self.config.balance_retry_delay()).await;
                    }
                }
            }
        }

        error!(
            account = %account,
            attempts,
            "failed to fetch balance after multiple attempts, keeping last known value"
        );
    }

    /// Follows the balance of `address`, or stops following when it is
    /// `None` or empty.
    pub async fn set_contract_address(&self, address: Option<Address>) {
        let address = address.filter(|address| !address.is_empty());
        {
            let _session = self.session.lock();
            self.contract_address.set(address.clone());
            if address.is_none() {
                self.contract_balance.set(EMPTY_BALANCE.to_string());
            }
        }
        if let Some(address) = address {
            debug!(contract = %address, "contract address set");
            self.update_contract_balance().await;
        }
    }

    /// Balance held by `address`, formatted for display
    pub async fn contract_balance_of(&self, address: &Address) -> WalletResult<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(WalletError::ProviderUnavailable)?;
        let raw = provider.balance(address).await?;
        Ok(format_units(&raw, NATIVE_DECIMALS, AMOUNT_DISPLAY_DECIMALS))
    }

    /// Re-fetches the balance of the followed contract.
    ///
    /// A failed fetch publishes `"0"`. A result for a contract that is no
    /// longer followed is discarded.
    pub async fn update_contract_balance(&self) {
        let Some(address) = self.contract_address.get() else {
            return;
        };

        let result = self.contract_balance_of(&address).await;

        let _session = self.session.lock();
        if self.contract_address.get().as_ref() != Some(&address) {
            debug!(contract = %address, "discarding balance of a previous contract");
            return;
        }
        match result {
            Ok(balance) => {
                debug!(contract = %address, balance = %balance, "contract balance fetched");
                self.contract_balance.set(balance);
            }
            Err(err) => {
                error!(contract = %address, "Error fetching contract balance: {}", err);
                self.contract_balance.set(EMPTY_BALANCE.to_string());
            }
        }
    }

    /// Whether `address` is well formed and has deployed code
    pub async fn is_valid_contract(&self, address: &str) -> bool {
        if !address.starts_with("0x") || address.len() != ADDRESS_LENGTH {
            return false;
        }
        let Some(provider) = self.provider.as_ref() else {
            debug!("no provider available to check contract");
            return false;
        };

        match provider.code(&Address::new(address)).await {
            Ok(code) => !code.is_empty() && code != "0x",
            Err(err) => {
                warn!(contract = address, "Error checking contract code: {}", err);
                false
            }
        }
    }

    /// Restores a previous session without prompting the user.
    ///
    /// Resolves `true` when an authorized account was found. Errors are
    /// logged and never surfaced.
    pub async fn check_connection(&self) -> bool {
        self.is_checking_connection.set(true);
        let restored = self.try_restore().await;
        self.is_checking_connection.set(false);
        restored
    }

    /// Alias of [`check_connection`](Self::check_connection)
    pub async fn auto_reconnect(&self) -> bool {
        self.check_connection().await
    }

    async fn try_restore(&self) -> bool {
        if !self.persistence.previously_connected() {
            debug!("no previous wallet connection found");
            self.is_connected.set(false);
            return false;
        }

        let Some(provider) = self.provider.clone() else {
            debug!("previous connection recorded but no provider is available");
            self.is_connected.set(false);
            return false;
        };

        debug!("checking existing wallet connection");
        match self.restore_from(provider.as_ref()).await {
            Ok(Some(account)) => {
                info!(account = %account, "wallet reconnected");
                true
            }
            Ok(None) => {
                info!("no authorized accounts, wallet is locked or access was revoked");
                self.persistence.set_previously_connected(false);
                self.is_connected.set(false);
                false
            }
            Err(err) => {
                warn!("failed to reconnect wallet: {}", err);
                self.persistence.set_previously_connected(false);
                self.reset_state();
                false
            }
        }
    }

    async fn restore_from(&self, provider: &dyn WalletProvider) -> WalletResult<Option<Address>> {
        let accounts = provider.authorized_accounts().await?;
        let Some(account) = first_account(accounts) else {
            return Ok(None);
        };

        let chain_id = provider.chain_id().await?;
        {
            let _session = self.session.lock();
            self.apply_network(&chain_id);
            self.account.set(Some(account.clone()));
            self.is_connected.set(true);
        }
        self.refresh_balance_for(&account).await;
        Ok(Some(account))
    }

    /// Starts processing provider events in arrival order.
    ///
    /// Returns `None` when there is no provider. The task holds only a weak
    /// reference and ends when the store is dropped or the provider closes
    /// its event stream.
    pub fn spawn_event_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut events = self.provider.as_ref()?.subscribe();
        let store = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(store) = store.upgrade() else {
                            break;
                        };
                        store.handle_provider_event(event).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "provider event listener lagged behind");
                    }
                    Err(RecvError::Closed) => {
                        debug!("provider event stream closed");
                        break;
                    }
                }
            }
        }))
    }

    /// Applies one provider event. Never fails; problems are logged.
    pub async fn handle_provider_event(self: &Arc<Self>, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match first_account(accounts) {
                None => {
                    info!("accounts changed to none");
                    self.disconnect();
                }
                Some(account) => {
                    info!(account = %account, "accounts changed");
                    {
                        let _session = self.session.lock();
                        self.account.set(Some(account.clone()));
                    }
                    self.refresh_balance_for(&account).await;
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                info!(chain_id = %chain_id, "chain changed");
                let has_account = {
                    let _session = self.session.lock();
                    self.apply_network(&chain_id);
                    self.account.get().is_some()
                };

                if has_account {
                    // Provider connections are not guaranteed ready right after a switch.
                    let store = Arc::clone(self);
                    let delay = self.config.chain_settle_delay();
                    tokio::spawn(async move {
                        sleep(delay).await;
                        store.refresh_balance().await;
                    });
                }
            }
            ProviderEvent::Disconnected => {
                info!("provider disconnected");
                self.disconnect();
            }
        }
    }

    fn apply_network(&self, chain_id: &str) {
        let name = self.catalog.network_name(chain_id).to_string();
        if name == UNKNOWN_NETWORK {
            warn!(chain_id, "chain id not found in network catalog");
        }
        debug!(chain_id, network = %name, "network updated");
        let _session = self.session.lock();
        self.chain_id.set(chain_id.to_string());
        self.network.set(name);
    }
}

fn first_account(accounts: Vec<Address>) -> Option<Address> {
    accounts.into_iter().next().filter(|account| !account.is_empty())
}
