//! Application configuration loaded from TOML.

use crate::{
    NetworkCatalog, NetworkDescriptor, BALANCE_RETRY_DELAY_MS, CHAIN_SETTLE_DELAY_MS,
    DEFAULT_DEBOUNCE_MS, DEFAULT_ITEMS_PER_PAGE, EXPLORER_TIMEOUT_SECS, MAX_BALANCE_ATTEMPTS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Connection state store settings
    pub session: SessionConfig,
    /// Transaction history pipeline settings
    pub history: HistoryConfig,
    /// Block explorer settings
    pub explorer: ExplorerConfig,
    /// Local state storage
    pub storage: StorageConfig,
    /// Overrides the built-in network catalog when non-empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<NetworkDescriptor>,
}

/// Connection state store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON-RPC endpoint of the wallet provider
    pub rpc_url: Option<String>,
    pub balance_attempts: u32,
    pub balance_retry_delay_ms: u64,
    pub chain_settle_delay_ms: u64,
}

/// Transaction history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub debounce_ms: u64,
    pub items_per_page: usize,
}

/// Block explorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted connection flag
    pub state_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            balance_attempts: MAX_BALANCE_ATTEMPTS,
            balance_retry_delay_ms: BALANCE_RETRY_DELAY_MS,
            chain_settle_delay_ms: CHAIN_SETTLE_DELAY_MS,
        }
    }
}

impl SessionConfig {
    pub fn balance_retry_delay(&self) -> Duration {
        Duration::from_millis(self.balance_retry_delay_ms)
    }

    pub fn chain_settle_delay(&self) -> Duration {
        Duration::from_millis(self.chain_settle_delay_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl HistoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            request_timeout_secs: EXPLORER_TIMEOUT_SECS,
        }
    }
}

impl ExplorerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    /// Parses and validates a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Loads configuration from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the invariants the session store and history pipeline rely on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.balance_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "session.balance_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.history.items_per_page == 0 {
            return Err(ConfigError::Invalid {
                field: "history.items_per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The configured network catalog, falling back to the built-in one
    pub fn catalog(&self) -> NetworkCatalog {
        if self.networks.is_empty() {
            NetworkCatalog::builtin()
        } else {
            NetworkCatalog::new(self.networks.clone())
        }
    }
}
