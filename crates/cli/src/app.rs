//! Wiring of the session store, the history pipeline and their adapters.

use crate::args::{Command, HistoryArgs};
use crate::output;
use anyhow::{bail, Context, Result};
use dapp_config::{
    format_chain_id, parse_chain_id, AppConfig, BALANCE_DISPLAY_DECIMALS, NATIVE_DECIMALS,
};
use dapp_core::{
    format_units, Address, ConnectionPersistence, FilePersistence, MemoryPersistence,
    TracingNotifier, WalletProvider,
};
use dapp_history::TransactionHistory;
use dapp_rpc_client::{ExplorerClient, JsonRpcProvider};
use dapp_wallets::ConnectionStore;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub struct App {
    config: AppConfig,
    store: Arc<ConnectionStore>,
    history: Arc<TransactionHistory>,
    explorer: Arc<ExplorerClient>,
}

impl App {
    pub fn build(config: AppConfig) -> Result<Self> {
        let catalog = config.catalog();

        let provider: Option<Arc<dyn WalletProvider>> = match &config.session.rpc_url {
            Some(raw) => {
                let url = Url::parse(raw).with_context(|| format!("invalid rpc url '{}'", raw))?;
                info!(endpoint = %url, "using JSON-RPC wallet provider");
                Some(Arc::new(JsonRpcProvider::new(url)?))
            }
            None => None,
        };

        let persistence: Arc<dyn ConnectionPersistence> = match config
            .storage
            .state_dir
            .clone()
            .or_else(FilePersistence::default_dir)
        {
            Some(dir) => Arc::new(FilePersistence::new(dir)),
            None => {
                warn!("no state directory available, the session will not be remembered");
                Arc::new(MemoryPersistence::default())
            }
        };

        let explorer = Arc::new(ExplorerClient::new(&catalog, &config.explorer)?);
        let store = ConnectionStore::new(provider, persistence, catalog, config.session.clone());
        let history = TransactionHistory::new(
            Arc::clone(&store),
            explorer.clone(),
            Arc::new(TracingNotifier),
            config.history.clone(),
        );

        Ok(Self {
            config,
            store,
            history,
            explorer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ConnectionStore> {
        &self.store
    }

    pub fn history(&self) -> &Arc<TransactionHistory> {
        &self.history
    }

    pub async fn run(&self, command: &Command, json: bool, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Status => {
                if !self.store.check_connection().await {
                    info!("no previous session to restore");
                }
                self.print_session(json, out)
            }
            Command::Connect => {
                self.connect().await?;
                self.print_session(json, out)
            }
            Command::Disconnect => {
                self.store.disconnect();
                writeln!(out, "Disconnected")?;
                Ok(())
            }
            Command::Switch { chain_id } => self.switch(chain_id, out).await,
            Command::Networks => {
                let networks: Vec<_> = self.store.catalog().iter().cloned().collect();
                if json {
                    output::print_json(out, &networks)
                } else {
                    output::print_networks(out, &networks)
                }
            }
            Command::History(args) => self.show_history(args, json, out).await,
            Command::Balance { address, network } => {
                self.show_balance(address, network, json, out).await
            }
        }
    }

    async fn connect(&self) -> Result<Address> {
        if !self.store.has_provider() {
            bail!("no wallet provider configured, pass --rpc-url or set session.rpc_url");
        }
        let account = self
            .store
            .connect()
            .await
            .context("failed to connect wallet")?;
        Ok(account)
    }

    /// Restores the previous session, connecting when there is none
    async fn ensure_session(&self) -> Result<()> {
        if self.store.check_connection().await {
            return Ok(());
        }
        self.connect().await.map(|_| ())
    }

    async fn switch(&self, raw: &str, out: &mut dyn Write) -> Result<()> {
        let chain_id = parse_chain_id(raw)
            .map(format_chain_id)
            .with_context(|| format!("invalid chain id '{}'", raw))?;

        self.store
            .switch_network(&chain_id)
            .await
            .with_context(|| format!("failed to switch to chain {}", chain_id))?;

        let name = self.store.catalog().network_name(&chain_id);
        writeln!(out, "Switch to {} ({}) requested", name, chain_id)?;
        Ok(())
    }

    async fn show_history(&self, args: &HistoryArgs, json: bool, out: &mut dyn Write) -> Result<()> {
        self.ensure_session().await?;

        if let Some(page_size) = args.page_size {
            self.history.set_items_per_page(page_size as usize);
        }
        self.history.set_type_filter(args.filter.into());
        if let Some(search) = &args.search {
            self.history.set_search_term(search.clone());
        }

        self.history
            .refresh_transactions()
            .await
            .context("failed to load transactions")?;

        if args.page != 1 && !self.history.go_to_page(args.page) {
            bail!(
                "page {} is out of range (1..={})",
                args.page,
                self.history.pagination_info().total_pages
            );
        }

        let view = self.history.view().get();
        let info = self.history.pagination_info();
        if json {
            output::print_json(out, &output::HistoryPage::new(&view.paged, info))
        } else {
            let symbol = self
                .store
                .network_descriptor()
                .map(|network| network.symbol)
                .unwrap_or_default();
            output::print_history(out, &view.paged, &info, &symbol)
        }
    }

    async fn show_balance(
        &self,
        address: &str,
        network: &str,
        json: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        let address = Address::new(address);
        let descriptor = self.store.catalog().by_name(network);
        let network = descriptor.map(|n| n.name.as_str()).unwrap_or(network);
        let raw = self
            .explorer
            .fetch_balance(&address, network)
            .await
            .with_context(|| format!("failed to fetch balance on {}", network))?;
        let balance = format_units(&raw, NATIVE_DECIMALS, BALANCE_DISPLAY_DECIMALS);

        if json {
            return output::print_json(
                out,
                &serde_json::json!({
                    "address": address,
                    "network": network,
                    "balance": balance,
                }),
            );
        }

        let symbol = descriptor.map(|n| n.symbol.as_str()).unwrap_or_default();
        writeln!(out, "{} {}", balance, symbol)?;
        Ok(())
    }

    fn print_session(&self, json: bool, out: &mut dyn Write) -> Result<()> {
        let state = self.store.snapshot();
        if json {
            output::print_json(out, &state)
        } else {
            let symbol = self
                .store
                .network_descriptor()
                .map(|network| network.symbol)
                .unwrap_or_default();
            output::print_session(out, &state, &symbol)
        }
    }
}
