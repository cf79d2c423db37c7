//! Configuration loading tests
//!
//! Covers TOML parsing with defaults, catalog overrides, validation and
//! loading from disk.

mod integration_tests {
    use dapp_config::{
        AppConfig, ConfigError, NetworkDescriptor, DEFAULT_DEBOUNCE_MS, DEFAULT_ITEMS_PER_PAGE,
        MAX_BALANCE_ATTEMPTS, UNKNOWN_NETWORK,
    };
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.history.items_per_page, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(config.session.balance_attempts, MAX_BALANCE_ATTEMPTS);
        assert_eq!(config.catalog().len(), 6);
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [history]
            items_per_page = 25

            [explorer]
            api_key = "KEY"
            "#,
        )
        .unwrap();

        assert_eq!(config.history.items_per_page, 25);
        assert_eq!(config.history.debounce(), Duration::from_millis(500));
        assert_eq!(config.explorer.api_key.as_deref(), Some("KEY"));
        assert_eq!(config.session.balance_retry_delay(), Duration::from_millis(500));
        assert_eq!(config.session.chain_settle_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_networks_override_builtin_catalog() {
        let config = AppConfig::from_toml_str(
            r#"
            [[networks]]
            chain_id = "0x7a69"
            name = "Localnet"
            symbol = "ETH"
            explorer_api_url = "http://127.0.0.1:4000/api"
            "#,
        )
        .unwrap();

        let catalog = config.catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.network_name("31337"), "Localnet");
        assert_eq!(catalog.network_name("0x1"), UNKNOWN_NETWORK);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = AppConfig::from_toml_str("[history]\nitems_per_page = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "history.items_per_page",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_balance_attempts_is_rejected() {
        let err = AppConfig::from_toml_str("[session]\nbalance_attempts = 0\n").unwrap_err();
        assert!(err.to_string().contains("session.balance_attempts"));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = AppConfig::from_toml_str("[history\nitems_per_page = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.explorer.api_key = Some("abc".to_string());
        config.networks = vec![NetworkDescriptor::new("0x1", "Ethereum", "ETH")];

        let text = config.to_toml_string().unwrap();
        let parsed = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_disk_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.toml");

        let missing = AppConfig::load(&path).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[session]\nrpc_url = \"http://localhost:8545\"").unwrap();
        drop(file);

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(
            config.session.rpc_url.as_deref(),
            Some("http://localhost:8545")
        );
    }

    #[test]
    fn test_descriptor_serializes_without_empty_urls() {
        let json = serde_json::to_value(NetworkDescriptor::new("0x89", "Polygon", "MATIC")).unwrap();
        assert_eq!(json["name"], "Polygon");
        assert!(json.get("rpc_url").is_none());
    }
}
