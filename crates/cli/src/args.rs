use clap::{Args, Parser, Subcommand, ValueEnum};
use dapp_config::AppConfig;
use dapp_history::TypeFilter;
use std::path::PathBuf;

/// Command-line arguments for dapp-cli
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dapp-cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Wallet session and transaction history from the command line"
)]
pub struct CliArgs {
    /// Specifies the config file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the wallet provider
    #[arg(long = "rpc-url", env = "DAPP_RPC_URL", value_name = "URL")]
    pub rpc_url: Option<String>,

    /// Block explorer API key
    #[arg(long = "api-key", env = "DAPP_EXPLORER_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding the persisted connection flag
    #[arg(long = "state-dir", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "verbose", value_enum, default_value = "info")]
    pub verbose: LogLevel,

    /// Print JSON instead of text
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Restore the previous session and show it
    Status,
    /// Request account access from the wallet provider
    Connect,
    /// Forget the current session
    Disconnect,
    /// Ask the wallet provider to switch chains
    Switch {
        /// Chain id, hex (0xaa36a7) or decimal (11155111)
        chain_id: String,
    },
    /// List the known networks
    Networks,
    /// Show a page of the connected account's transactions
    History(HistoryArgs),
    /// Look up a native balance through the block explorer
    Balance {
        /// Account address
        address: String,
        /// Network name as listed by `networks`
        #[arg(long, default_value = "Ethereum")]
        network: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct HistoryArgs {
    /// Transaction direction
    #[arg(long, value_enum, default_value = "all")]
    pub filter: FilterArg,

    /// Case-insensitive text matched against hash and addresses
    #[arg(long)]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Transactions per page
    #[arg(long = "page-size", value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Sent,
    Received,
}

impl From<FilterArg> for TypeFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::All => TypeFilter::All,
            FilterArg::Sent => TypeFilter::Sent,
            FilterArg::Received => TypeFilter::Received,
        }
    }
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive for `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl CliArgs {
    /// Effective configuration file path
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join("dapp-wallet").join("config.toml"))
        })
    }

    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(rpc_url) = &self.rpc_url {
            config.session.rpc_url = Some(rpc_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.explorer.api_key = Some(api_key.clone());
        }
        if let Some(state_dir) = &self.state_dir {
            config.storage.state_dir = Some(state_dir.clone());
        }
        if let Command::History(history) = &self.command {
            if let Some(page_size) = history.page_size {
                config.history.items_per_page = page_size as usize;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.as_directive(), "warn");
    }

    #[test]
    fn test_filter_arg_conversion() {
        assert_eq!(TypeFilter::from(FilterArg::All), TypeFilter::All);
        assert_eq!(TypeFilter::from(FilterArg::Sent), TypeFilter::Sent);
        assert_eq!(TypeFilter::from(FilterArg::Received), TypeFilter::Received);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "dapp-cli",
            "--rpc-url",
            "http://localhost:8545",
            "--api-key",
            "KEY",
            "--state-dir",
            "/tmp/dapp",
            "history",
            "--page-size",
            "25",
        ]);
        let mut config = AppConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.session.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(config.explorer.api_key.as_deref(), Some("KEY"));
        assert_eq!(config.storage.state_dir, Some(PathBuf::from("/tmp/dapp")));
        assert_eq!(config.history.items_per_page, 25);
    }
}
