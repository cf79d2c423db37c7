//! dapp-wallet Core
//!
//! Building blocks shared by the connection state store and the transaction
//! history pipeline:
//! - [`Observable`], the replay-latest publish/subscribe value holder
//! - the transaction data model ([`RawTransaction`], [`TransactionRecord`])
//! - error types for provider and transaction source failures
//! - traits for the external collaborators (wallet provider, transaction
//!   source, persistence, notifications) and default adapters for them
//! - fixed-point formatting of smallest-unit amounts

pub mod error;
pub mod notifier;
pub mod observable;
pub mod persistence;
pub mod provider;
pub mod source;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod units;

pub use error::{SourceError, SourceResult, WalletError, WalletResult};
pub use notifier::{Notifier, TracingNotifier};
pub use observable::{Observable, Subscription};
pub use persistence::{ConnectionPersistence, FilePersistence, MemoryPersistence};
pub use provider::{ProviderEvent, WalletProvider};
pub use source::TransactionSource;
pub use types::{Address, RawTransaction, TransactionKind, TransactionRecord, TransactionStatus};
pub use units::{format_units, parse_decimal_quantity, parse_hex_quantity};
