//! dapp-wallet CLI Library
//!
//! Argument parsing, adapter wiring and output rendering for the `dapp-cli`
//! binary. Kept as a library so the commands can be driven from tests.

pub mod app;
pub mod args;
pub mod output;

pub use app::App;
pub use args::{CliArgs, Command, FilterArg, HistoryArgs, LogLevel};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
