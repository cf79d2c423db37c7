//! dapp-wallet History Library
//!
//! Turns the raw transaction list of the connected account into the view a
//! front end renders:
//! - mapping explorer records to [`TransactionRecord`](dapp_core::TransactionRecord)s
//! - type filtering, free-text search and pagination
//! - debounced, switch-latest refetching driven by the session's
//!   (account, network) identity

pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod view;

pub use error::{HistoryError, HistoryResult};
pub use mapping::{map_transaction, map_transactions};
pub use pipeline::TransactionHistory;
pub use view::{
    apply_filters, clamp_page, page_slice, total_pages, DerivedView, FilterCriteria,
    PaginationInfo, PaginationState, TypeFilter,
};
