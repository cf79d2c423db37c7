//! End-to-end behavior of `WalletSession` with scripted collaborators.

use dapp_core::testing::{raw_transaction, MockTransactionSource, MockWalletProvider, RecordingNotifier};
use dapp_wallet::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
const PEER: &str = "0x9ee4000000000000000000000000000000000009";

struct Fixture {
    provider: Arc<MockWalletProvider>,
    source: Arc<MockTransactionSource>,
    notifier: Arc<RecordingNotifier>,
    session: WalletSession,
}

impl Fixture {
    fn new() -> Self {
        let provider = Arc::new(
            MockWalletProvider::new()
                .with_accounts(&[ALICE])
                .with_balance_wei(2_000_000_000_000_000_000),
        );
        let source = Arc::new(MockTransactionSource::new(&["Ethereum", "Sepolia"]));
        let notifier = Arc::new(RecordingNotifier::default());
        let session = WalletSession::new(
            Some(provider.clone() as Arc<dyn WalletProvider>),
            source.clone(),
            Arc::new(MemoryPersistence::default()),
            notifier.clone(),
            &AppConfig::default(),
        );

        Self {
            provider,
            source,
            notifier,
            session,
        }
    }

    fn hashes(&self) -> Vec<String> {
        self.session
            .history()
            .view()
            .get()
            .all
            .iter()
            .map(|record| record.hash.clone())
            .collect()
    }
}

#[tokio::test(start_paused = true)]
async fn test_connect_loads_history() {
    let fixture = Fixture::new();
    fixture.source.set_response(
        ALICE,
        "Ethereum",
        Ok(vec![
            raw_transaction("0x02", ALICE, PEER, "1000000000000000000", 1_700_000_100),
            raw_transaction("0x01", PEER, ALICE, "500000000000000000", 1_700_000_000),
        ]),
    );
    fixture.session.start();

    fixture.session.store().connect().await.unwrap();
    sleep(Duration::from_millis(600)).await;

    let state = fixture.session.store().snapshot();
    assert!(state.is_connected);
    assert_eq!(state.network_name, "Ethereum");
    assert_eq!(state.balance, "2.0000");
    assert_eq!(fixture.hashes(), vec!["0x02", "0x01"]);
    assert_eq!(fixture.session.history().pagination_info().total_items, 2);
    assert!(fixture.notifier.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_provider_events_flow_into_history() {
    let fixture = Fixture::new();
    fixture.source.set_response(
        ALICE,
        "Sepolia",
        Ok(vec![raw_transaction("0x5e", PEER, ALICE, "1", 1_700_000_000)]),
    );
    fixture.session.start();
    fixture.session.store().connect().await.unwrap();
    sleep(Duration::from_millis(600)).await;
    assert!(fixture.hashes().is_empty());

    fixture
        .provider
        .emit(ProviderEvent::ChainChanged("0xaa36a7".to_string()));
    sleep(Duration::from_millis(600)).await;

    assert_eq!(fixture.session.store().network().get(), "Sepolia");
    assert_eq!(fixture.hashes(), vec!["0x5e"]);
    assert_eq!(fixture.source.fetch_count(), 2);

    fixture.provider.emit(ProviderEvent::AccountsChanged(Vec::new()));
    sleep(Duration::from_millis(10)).await;

    assert!(!fixture.session.store().is_connected().get());
    assert!(fixture.hashes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stop_detaches_history_and_listener() {
    let fixture = Fixture::new();
    fixture.session.start();
    fixture.session.store().connect().await.unwrap();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(fixture.source.fetch_count(), 1);

    fixture.session.stop();
    fixture
        .provider
        .emit(ProviderEvent::ChainChanged("0xaa36a7".to_string()));
    sleep(Duration::from_millis(600)).await;

    assert_eq!(fixture.session.store().network().get(), "Ethereum");
    assert_eq!(fixture.source.fetch_count(), 1);
}

#[tokio::test]
async fn test_start_twice_is_harmless() {
    let fixture = Fixture::new();

    fixture.session.start();
    fixture.session.start();
    fixture.session.store().connect().await.unwrap();

    assert_eq!(fixture.session.store().account().get(), Some(Address::new(ALICE)));
}
