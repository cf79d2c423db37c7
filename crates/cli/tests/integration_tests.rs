//! End-to-end tests driving `App` against a mocked wallet node and explorer.

use dapp_cli::{App, Command, FilterArg, HistoryArgs};
use dapp_config::{AppConfig, NetworkDescriptor};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use tempfile::TempDir;

const ACCOUNT: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
const PEER: &str = "0x0000000000000000000000000000000000000002";

struct TestNode {
    server: ServerGuard,
    state: TempDir,
}

impl TestNode {
    async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            state: TempDir::new().unwrap(),
        }
    }

    fn config(&self, with_provider: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.networks = vec![NetworkDescriptor::new("0xaa36a7", "Sepolia", "ETH")
            .with_explorer_api(&format!("{}/api", self.server.url()))];
        config.session.rpc_url = with_provider.then(|| self.server.url());
        config.session.balance_retry_delay_ms = 1;
        config.storage.state_dir = Some(self.state.path().to_path_buf());
        config
    }

    fn app(&self) -> App {
        App::build(self.config(true)).unwrap()
    }

    async fn rpc(&mut self, method: &str, result: Value) -> Mock {
        self.server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
            .create_async()
            .await
    }

    async fn wallet(&mut self) {
        self.rpc("eth_requestAccounts", json!([ACCOUNT])).await;
        self.rpc("eth_accounts", json!([ACCOUNT])).await;
        self.rpc("eth_chainId", json!("0xaa36a7")).await;
        self.rpc("eth_getBalance", json!("0x14d1120d7b160000")).await;
    }

    async fn explorer(&mut self, result: Value) -> Mock {
        self.server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("action".into(), "txlist".into()))
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "1", "message": "OK", "result": result }).to_string())
            .create_async()
            .await
    }
}

fn explorer_tx(hash: &str, from: &str, to: &str, timestamp: u64) -> Value {
    json!({
        "blockNumber": "5000000",
        "timeStamp": timestamp.to_string(),
        "hash": hash,
        "from": from,
        "to": to,
        "value": "1000000000000000000",
        "isError": "0",
        "txreceipt_status": "1"
    })
}

async fn run(app: &App, command: Command, json: bool) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    app.run(&command, json, &mut buffer).await?;
    Ok(String::from_utf8(buffer).unwrap())
}

fn history(filter: FilterArg) -> Command {
    Command::History(HistoryArgs {
        filter,
        search: None,
        page: 1,
        page_size: None,
    })
}

#[tokio::test]
async fn test_connect_then_status_restores_session() {
    let mut node = TestNode::new().await;
    node.wallet().await;

    let before = run(&node.app(), Command::Status, false).await.unwrap();
    assert_eq!(before, "Not connected\n");

    let connected = run(&node.app(), Command::Connect, false).await.unwrap();
    assert!(connected.contains(&format!("Account:  {}", ACCOUNT)));
    assert!(connected.contains("Network:  Sepolia (0xaa36a7)"));
    assert!(connected.contains("Balance:  1.5000 ETH"));

    // a fresh process sees the persisted flag
    let restored = run(&node.app(), Command::Status, false).await.unwrap();
    assert_eq!(restored, connected);
}

#[tokio::test]
async fn test_disconnect_forgets_session() {
    let mut node = TestNode::new().await;
    node.wallet().await;

    run(&node.app(), Command::Connect, false).await.unwrap();
    let output = run(&node.app(), Command::Disconnect, false).await.unwrap();
    assert_eq!(output, "Disconnected\n");

    let status = run(&node.app(), Command::Status, false).await.unwrap();
    assert_eq!(status, "Not connected\n");
}

#[tokio::test]
async fn test_history_lists_transactions() {
    let mut node = TestNode::new().await;
    node.wallet().await;
    let mock = node
        .explorer(json!([
            explorer_tx("0xbbb", ACCOUNT, PEER, 1_705_000_100),
            explorer_tx("0xaaa", PEER, ACCOUNT, 1_705_000_000),
        ]))
        .await;

    let output = run(&node.app(), history(FilterArg::All), false).await.unwrap();

    mock.assert_async().await;
    assert!(output.contains("0xbbb"));
    assert!(output.contains("0xaaa"));
    assert!(output.contains("Page 1 of 1 (2 of 2 transactions)"));
}

#[tokio::test]
async fn test_history_filter_in_json() {
    let mut node = TestNode::new().await;
    node.wallet().await;
    node.explorer(json!([
        explorer_tx("0xbbb", ACCOUNT, PEER, 1_705_000_100),
        explorer_tx("0xaaa", PEER, ACCOUNT, 1_705_000_000),
    ]))
    .await;

    let output = run(&node.app(), history(FilterArg::Received), true).await.unwrap();
    let page: Value = serde_json::from_str(&output).unwrap();

    let transactions = page["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["hash"], "0xaaa");
    assert_eq!(page["pagination"]["filtered_items"], 1);
    assert_eq!(page["pagination"]["total_items"], 2);
}

#[tokio::test]
async fn test_history_page_out_of_range() {
    let mut node = TestNode::new().await;
    node.wallet().await;
    node.explorer(json!([explorer_tx("0xaaa", PEER, ACCOUNT, 1_705_000_000)]))
        .await;

    let command = Command::History(HistoryArgs {
        filter: FilterArg::All,
        search: None,
        page: 3,
        page_size: None,
    });
    let err = run(&node.app(), command, false).await.unwrap_err();

    assert!(err.to_string().contains("page 3 is out of range"));
}

#[tokio::test]
async fn test_networks_as_json() {
    let node = TestNode::new().await;

    let output = run(&node.app(), Command::Networks, true).await.unwrap();
    let networks: Vec<NetworkDescriptor> = serde_json::from_str(&output).unwrap();

    assert_eq!(networks.len(), 1);
    assert_eq!(networks[0].name, "Sepolia");
}

#[tokio::test]
async fn test_balance_through_explorer() {
    let mut node = TestNode::new().await;
    node.server
        .mock("GET", "/api")
        .match_query(Matcher::UrlEncoded("action".into(), "balance".into()))
        .with_body(r#"{"status":"1","message":"OK","result":"250000000000000000"}"#)
        .create_async()
        .await;

    let command = Command::Balance {
        address: ACCOUNT.to_string(),
        network: "sepolia".to_string(),
    };
    let output = run(&node.app(), command, false).await.unwrap();

    assert_eq!(output, "0.2500 ETH\n");
}

#[tokio::test]
async fn test_connect_without_provider_fails() {
    let node = TestNode::new().await;
    let app = App::build(node.config(false)).unwrap();

    let err = run(&app, Command::Connect, false).await.unwrap_err();

    assert!(err.to_string().contains("no wallet provider configured"));
}

#[tokio::test]
async fn test_switch_rejects_malformed_chain_id() {
    let node = TestNode::new().await;

    let command = Command::Switch {
        chain_id: "sepolia".to_string(),
    };
    let err = run(&node.app(), command, false).await.unwrap_err();

    assert!(err.to_string().contains("invalid chain id"));
}
