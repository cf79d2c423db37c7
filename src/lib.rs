//! # dapp-wallet
//!
//! Wallet session state and derived transaction history views for dApp
//! front ends.
//!
//! The library is organized into several crates:
//!
//! - [`config`] - configuration file format and the network catalog
//! - [`core`] - observable values, data model and collaborator traits
//! - [`wallets`] - the connection state store
//! - [`history`] - the filtered and paginated transaction history pipeline
//! - `rpc_client` - JSON-RPC wallet provider and block explorer client
//!   (feature `rpc`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dapp_wallet::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run(provider: Arc<dyn WalletProvider>, source: Arc<dyn TransactionSource>) {
//! let config = AppConfig::default();
//! let session = WalletSession::new(
//!     Some(provider),
//!     source,
//!     Arc::new(MemoryPersistence::default()),
//!     Arc::new(TracingNotifier),
//!     &config,
//! );
//! session.start();
//!
//! if !session.store().check_connection().await {
//!     session.store().connect().await.ok();
//! }
//! let page = session.history().view().get();
//! println!("{} transactions on this page", page.paged.len());
//! # }
//! ```

#![warn(missing_docs)]

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

pub use dapp_config as config;
pub use dapp_core as core;
pub use dapp_history as history;
pub use dapp_wallets as wallets;

#[cfg(feature = "rpc")]
pub use dapp_rpc_client as rpc_client;

/// Common imports for dApp front ends
pub mod prelude {
    pub use crate::config::{AppConfig, NetworkCatalog, NetworkDescriptor};
    pub use crate::core::{
        Address, ConnectionPersistence, FilePersistence, MemoryPersistence, Notifier,
        Observable, ProviderEvent, TracingNotifier, TransactionRecord, TransactionSource,
        WalletError, WalletProvider,
    };
    pub use crate::history::{DerivedView, PaginationInfo, TransactionHistory, TypeFilter};
    pub use crate::wallets::{ConnectionState, ConnectionStore};
    pub use crate::WalletSession;

    #[cfg(feature = "rpc")]
    pub use crate::rpc_client::{ExplorerClient, JsonRpcProvider};
}

use crate::config::AppConfig;
use crate::core::{ConnectionPersistence, Notifier, TransactionSource, WalletProvider};
use crate::history::TransactionHistory;
use crate::wallets::ConnectionStore;

/// A connection store and the history pipeline following it
pub struct WalletSession {
    store: Arc<ConnectionStore>,
    history: Arc<TransactionHistory>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSession {
    /// Builds the store and the pipeline without starting either
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        source: Arc<dyn TransactionSource>,
        persistence: Arc<dyn ConnectionPersistence>,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        let store = ConnectionStore::new(
            provider,
            persistence,
            config.catalog(),
            config.session.clone(),
        );
        let history = TransactionHistory::new(
            Arc::clone(&store),
            source,
            notifier,
            config.history.clone(),
        );

        Self {
            store,
            history,
            listener: Mutex::new(None),
        }
    }

    /// Starts the provider event listener and the history pipeline.
    ///
    /// Must be called from within a Tokio runtime. Calling it again while
    /// started is a no-op.
    pub fn start(&self) {
        let mut listener = self.listener.lock();
        if listener.is_none() {
            *listener = self.store.spawn_event_listener();
        }
        self.history.start();
        debug!(has_provider = self.store.has_provider(), "wallet session started");
    }

    /// Stops listening for provider events and detaches the pipeline
    pub fn stop(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
        self.history.stop();
        debug!("wallet session stopped");
    }

    /// The connection state store
    pub fn store(&self) -> &Arc<ConnectionStore> {
        &self.store
    }

    /// The transaction history pipeline
    pub fn history(&self) -> &Arc<TransactionHistory> {
        &self.history
    }
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}

/// dapp-wallet library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
