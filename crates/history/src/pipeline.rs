//! Transaction history pipeline.
//!
//! Owns the raw transaction set of the connected account together with the
//! filter, search and pagination inputs, and republishes a complete
//! [`DerivedView`] whenever any of them changes.
//!
//! The (account, network) identity is followed through the connection
//! store's observables. An identity change clears the raw set and
//! supersedes any in-flight fetch immediately; the refetch itself waits for
//! the identity to settle for the debounce window. Every fetch carries a
//! request token and only the latest token's result is applied.
//!
//! Recomputation is serialized by a reentrant publish lock, so a view
//! computed from older inputs is never published after a newer one.

use crate::error::{HistoryError, HistoryResult};
use crate::mapping::map_transactions;
use crate::view::{derive, DerivedView, FilterCriteria, PaginationInfo, PaginationState, TypeFilter};
use dapp_config::{HistoryConfig, DEFAULT_ITEMS_PER_PAGE, UNKNOWN_NETWORK};
use dapp_core::{Address, Notifier, Observable, Subscription, TransactionRecord, TransactionSource};
use dapp_wallets::ConnectionStore;
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// The (account, network) pair that selects a transaction set
#[derive(Debug, Clone, PartialEq, Eq)]
struct Identity {
    account: Option<Address>,
    network: String,
}

impl Identity {
    fn current(store: &ConnectionStore) -> Self {
        Self {
            account: store.account().get(),
            network: store.network().get(),
        }
    }
}

struct Inputs {
    all: Vec<TransactionRecord>,
    criteria: FilterCriteria,
    pagination: PaginationState,
    filtered_count: usize,
    is_loading: bool,
    /// Bumped on every recomputation; a publish pass stops once it goes stale
    revision: u64,
    identity: Option<Identity>,
}

/// Filtered, searched and paginated view over the connected account's
/// transactions
pub struct TransactionHistory {
    store: Arc<ConnectionStore>,
    source: Arc<dyn TransactionSource>,
    notifier: Arc<dyn Notifier>,
    config: HistoryConfig,

    inputs: Mutex<Inputs>,
    view: Observable<Arc<DerivedView>>,
    pagination: Observable<PaginationState>,
    criteria: Observable<FilterCriteria>,
    publish: ReentrantMutex<()>,

    debounce_generation: AtomicU64,
    request_token: AtomicU64,
    started: AtomicBool,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl TransactionHistory {
    pub fn new(
        store: Arc<ConnectionStore>,
        source: Arc<dyn TransactionSource>,
        notifier: Arc<dyn Notifier>,
        config: HistoryConfig,
    ) -> Arc<Self> {
        let items_per_page = if config.items_per_page == 0 {
            DEFAULT_ITEMS_PER_PAGE
        } else {
            config.items_per_page
        };
        let pagination = PaginationState {
            items_per_page,
            ..PaginationState::default()
        };

        Arc::new(Self {
            store,
            source,
            notifier,
            config,
            inputs: Mutex::new(Inputs {
                all: Vec::new(),
                criteria: FilterCriteria::default(),
                pagination,
                filtered_count: 0,
                is_loading: false,
                revision: 0,
                identity: None,
            }),
            view: Observable::new(Arc::new(DerivedView::default())),
            pagination: Observable::new(pagination),
            criteria: Observable::new(FilterCriteria::default()),
            publish: ReentrantMutex::new(()),
            debounce_generation: AtomicU64::new(0),
            request_token: AtomicU64::new(0),
            started: AtomicBool::new(false),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Follows the store's account and network. Calling it twice is a no-op.
    ///
    /// Must run inside a tokio runtime; debounce timers are spawned on it.
    pub fn start(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let weak = Arc::downgrade(self);
        let on_account = self.store.account().subscribe(move |_| {
            if let Some(history) = weak.upgrade() {
                history.on_identity_changed();
            }
        });

        let weak = Arc::downgrade(self);
        let on_network = self.store.network().subscribe(move |_| {
            if let Some(history) = weak.upgrade() {
                history.on_identity_changed();
            }
        });

        self.subscriptions.lock().extend([on_account, on_network]);
        debug!("transaction history started");
    }

    /// Stops following the store, cancels a pending debounced refetch and
    /// discards the result of any in-flight fetch
    pub fn stop(&self) {
        let subscriptions: Vec<Subscription> = self.subscriptions.lock().drain(..).collect();
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
        self.debounce_generation.fetch_add(1, Ordering::SeqCst);
        let was_loading = {
            let mut inputs = self.inputs.lock();
            self.request_token.fetch_add(1, Ordering::SeqCst);
            std::mem::replace(&mut inputs.is_loading, false)
        };
        self.started.store(false, Ordering::SeqCst);
        debug!("transaction history stopped");

        if was_loading {
            self.recompute();
        }
    }

    pub fn view(&self) -> &Observable<Arc<DerivedView>> {
        &self.view
    }

    pub fn pagination(&self) -> &Observable<PaginationState> {
        &self.pagination
    }

    pub fn criteria(&self) -> &Observable<FilterCriteria> {
        &self.criteria
    }

    pub fn is_loading(&self) -> bool {
        self.inputs.lock().is_loading
    }

    pub fn pagination_info(&self) -> PaginationInfo {
        let inputs = self.inputs.lock();
        PaginationInfo {
            current_page: inputs.pagination.current_page,
            total_pages: inputs.pagination.total_pages,
            total_items: inputs.all.len(),
            filtered_items: inputs.filtered_count,
            items_per_page: inputs.pagination.items_per_page,
        }
    }

    pub fn set_type_filter(&self, filter: TypeFilter) {
        let _pass = self.publish.lock();
        let criteria = {
            let mut inputs = self.inputs.lock();
            inputs.criteria.type_filter = filter;
            inputs.pagination.current_page = 1;
            inputs.criteria.clone()
        };
        debug!(filter = %filter, "type filter changed");
        self.criteria.set(criteria);
        self.recompute();
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let _pass = self.publish.lock();
        let criteria = {
            let mut inputs = self.inputs.lock();
            inputs.criteria.search_term = term.into();
            inputs.pagination.current_page = 1;
            inputs.criteria.clone()
        };
        debug!(term = %criteria.search_term, "search term changed");
        self.criteria.set(criteria);
        self.recompute();
    }

    /// Changes the page size and returns to the first page. Zero is ignored.
    pub fn set_items_per_page(&self, items_per_page: usize) {
        if items_per_page == 0 {
            warn!("ignoring page size of zero");
            return;
        }
        {
            let mut inputs = self.inputs.lock();
            inputs.pagination.items_per_page = items_per_page;
            inputs.pagination.current_page = 1;
        }
        self.recompute();
    }

    /// Moves to `page` when it lies within `1..=total_pages`.
    ///
    /// Returns whether the page was applied.
    pub fn go_to_page(&self, page: usize) -> bool {
        {
            let mut inputs = self.inputs.lock();
            if page < 1 || page > inputs.pagination.total_pages {
                debug!(
                    page,
                    total_pages = inputs.pagination.total_pages,
                    "ignoring out of range page"
                );
                return false;
            }
            inputs.pagination.current_page = page;
        }
        self.recompute();
        true
    }

    /// Empties the raw set, resets pagination and supersedes any in-flight fetch
    pub fn clear_transactions(&self) {
        {
            let mut inputs = self.inputs.lock();
            self.request_token.fetch_add(1, Ordering::SeqCst);
            inputs.all.clear();
            inputs.is_loading = false;
            inputs.pagination.current_page = 1;
        }
        debug!("transactions cleared");
        self.recompute();
    }

    /// Fetches the current identity's transactions right away.
    ///
    /// Supersedes any in-flight fetch. Resolves without fetching when there
    /// is no account or the network cannot be served.
    pub async fn refresh_transactions(&self) -> HistoryResult<()> {
        let identity = Identity::current(&self.store);
        match self.fetch_target(&identity) {
            Some((account, network)) => self.fetch(account, network).await,
            None => {
                debug!("nothing to refresh for the current account and network");
                Ok(())
            }
        }
    }

    fn on_identity_changed(self: &Arc<Self>) {
        let identity = Identity::current(&self.store);
        {
            let mut inputs = self.inputs.lock();
            if inputs.identity.as_ref() == Some(&identity) {
                return;
            }
            inputs.identity = Some(identity.clone());
            self.request_token.fetch_add(1, Ordering::SeqCst);
            inputs.all.clear();
            inputs.is_loading = false;
            inputs.pagination.current_page = 1;
        }

        debug!(
            account = identity.account.as_ref().map(Address::as_str).unwrap_or(""),
            network = %identity.network,
            "account or network changed"
        );
        self.recompute();
        self.schedule_settle();
    }

    fn schedule_settle(self: &Arc<Self>) {
        let generation = self
            .debounce_generation
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1);

        let Ok(runtime) = Handle::try_current() else {
            warn!("no tokio runtime available, skipping transaction refresh");
            return;
        };

        let history = Arc::downgrade(self);
        let delay = self.config.debounce();
        runtime.spawn(async move {
            sleep(delay).await;
            let Some(history) = history.upgrade() else {
                return;
            };
            if history.debounce_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            history.on_identity_settled().await;
        });
    }

    async fn on_identity_settled(&self) {
        let Some(identity) = self.inputs.lock().identity.clone() else {
            return;
        };

        let Some((account, network)) = self.fetch_target(&identity) else {
            {
                let mut inputs = self.inputs.lock();
                inputs.all.clear();
                inputs.is_loading = false;
            }
            self.recompute();
            return;
        };

        if let Err(err) = self.fetch(account, network).await {
            error!("Error loading transactions: {}", err);
            self.notifier
                .show_error(&format!("Failed to load transactions: {}", err));
        }
    }

    fn fetch_target(&self, identity: &Identity) -> Option<(Address, String)> {
        let account = identity.account.as_ref().filter(|a| !a.is_empty())?;
        if identity.network == UNKNOWN_NETWORK {
            debug!("network unknown, not fetching transactions");
            return None;
        }
        if !self.source.is_network_supported(&identity.network) {
            debug!(network = %identity.network, "network not supported by transaction source");
            return None;
        }
        Some((account.clone(), identity.network.clone()))
    }

    async fn fetch(&self, account: Address, network: String) -> HistoryResult<()> {
        let token = {
            let mut inputs = self.inputs.lock();
            inputs.is_loading = true;
            self.request_token
                .fetch_add(1, Ordering::SeqCst)
                .wrapping_add(1)
        };
        self.recompute();

        info!(account = %account, network = %network, "fetching transactions");
        let result = self.source.fetch_transactions(&account, &network).await;

        {
            let mut inputs = self.inputs.lock();
            if self.request_token.load(Ordering::SeqCst) != token {
                debug!(account = %account, network = %network, "discarding superseded fetch");
                return Ok(());
            }
            inputs.is_loading = false;
            match &result {
                Ok(raw) => {
                    inputs.all = map_transactions(raw, &account, &network);
                    info!(count = inputs.all.len(), "transactions loaded");
                }
                Err(_) => inputs.all.clear(),
            }
        }
        self.recompute();

        result.map(|_| ()).map_err(HistoryError::from)
    }

    fn recompute(&self) {
        let _pass = self.publish.lock();
        let (revision, view, pagination) = {
            let mut guard = self.inputs.lock();
            let inputs = &mut *guard;
            inputs.revision = inputs.revision.wrapping_add(1);
            let view = derive(
                &inputs.all,
                &inputs.criteria,
                &mut inputs.pagination,
                inputs.is_loading,
            );
            inputs.filtered_count = view.filtered.len();
            (inputs.revision, view, inputs.pagination)
        };

        if !self.is_current(revision) {
            return;
        }
        self.pagination.set(pagination);
        if !self.is_current(revision) {
            return;
        }
        self.view.set(Arc::new(view));
    }

    fn is_current(&self, revision: u64) -> bool {
        self.inputs.lock().revision == revision
    }
}
