//! Filtering, search and pagination over mapped transaction records.
//!
//! Everything here is pure; the pipeline owns the inputs and calls these
//! functions on every recomputation.

use dapp_config::DEFAULT_ITEMS_PER_PAGE;
use dapp_core::{TransactionKind, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction filter applied before search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Sent,
    Received,
}

impl TypeFilter {
    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Sent => kind == TransactionKind::Sent,
            TypeFilter::Received => kind == TransactionKind::Received,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Sent => write!(f, "sent"),
            TypeFilter::Received => write!(f, "received"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "sent" => Ok(TypeFilter::Sent),
            "received" => Ok(TypeFilter::Received),
            other => Err(format!("unknown transaction type filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub type_filter: TypeFilter,
    pub search_term: String,
}

impl FilterCriteria {
    /// Type filter first, then a case-insensitive substring search over the
    /// counterparty, hash and both addresses. A blank term matches everything.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if !self.type_filter.matches(record.kind) {
            return false;
        }

        let needle = self.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&record.counterparty, &record.hash, &record.from, &record.to]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Pagination parameters; `current_page` is always within `1..=total_pages`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            total_pages: 1,
        }
    }
}

/// One consistent result of a recomputation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedView {
    pub all: Vec<TransactionRecord>,
    pub filtered: Vec<TransactionRecord>,
    pub paged: Vec<TransactionRecord>,
    pub is_loading: bool,
}

/// Summary a pager control renders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub filtered_items: usize,
    pub items_per_page: usize,
}

pub fn apply_filters(records: &[TransactionRecord], criteria: &FilterCriteria) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// `max(1, ceil(filtered / items_per_page))`
pub fn total_pages(filtered: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    filtered.div_ceil(items_per_page).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Records of the 1-based `page`; empty when the page lies past the end
pub fn page_slice(
    records: &[TransactionRecord],
    page: usize,
    items_per_page: usize,
) -> Vec<TransactionRecord> {
    let start = page.saturating_sub(1).saturating_mul(items_per_page);
    records
        .iter()
        .skip(start)
        .take(items_per_page)
        .cloned()
        .collect()
}

/// Runs the whole recomputation, writing the clamped page and page count
/// back into `pagination`.
pub(crate) fn derive(
    all: &[TransactionRecord],
    criteria: &FilterCriteria,
    pagination: &mut PaginationState,
    is_loading: bool,
) -> DerivedView {
    let filtered = apply_filters(all, criteria);
    pagination.total_pages = total_pages(filtered.len(), pagination.items_per_page);
    pagination.current_page = clamp_page(pagination.current_page, pagination.total_pages);
    let paged = page_slice(&filtered, pagination.current_page, pagination.items_per_page);

    DerivedView {
        all: all.to_vec(),
        filtered,
        paged,
        is_loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dapp_core::TransactionStatus;

    fn record(hash: &str, kind: TransactionKind, counterparty: &str) -> TransactionRecord {
        let me = "0xme00000000000000000000000000000000000000";
        let (from, to) = match kind {
            TransactionKind::Sent => (me, counterparty),
            TransactionKind::Received => (counterparty, me),
        };
        TransactionRecord {
            id: hash.to_string(),
            hash: hash.to_string(),
            kind,
            amount: "1.000000".to_string(),
            counterparty: counterparty.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            status: TransactionStatus::Completed,
            network: "Ethereum".to_string(),
        }
    }

    fn numbered(count: usize) -> Vec<TransactionRecord> {
        (0..count)
            .map(|i| record(&format!("0xhash{:02}", i), TransactionKind::Received, "0xpeer"))
            .collect()
    }

    #[test]
    fn test_type_filter_parsing() {
        assert_eq!("Sent".parse::<TypeFilter>().unwrap(), TypeFilter::Sent);
        assert_eq!(" received ".parse::<TypeFilter>().unwrap(), TypeFilter::Received);
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert!("outgoing".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn test_sent_filter_with_search() {
        let records = vec![
            record("0x01", TransactionKind::Sent, "0xABC123"),
            record("0x02", TransactionKind::Sent, "0xfff000"),
            record("0x03", TransactionKind::Received, "0xabc999"),
            record("0x04", TransactionKind::Sent, "0x00abcd"),
        ];
        let criteria = FilterCriteria {
            type_filter: TypeFilter::Sent,
            search_term: "  0xAbC ".to_string(),
        };

        let filtered = apply_filters(&records, &criteria);

        let hashes: Vec<_> = filtered.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0x01"]);
    }

    #[test]
    fn test_search_covers_hash_and_addresses() {
        let records = vec![
            record("0xdeadbeef", TransactionKind::Received, "0x11"),
            record("0x02", TransactionKind::Received, "0x22"),
        ];
        let by_hash = FilterCriteria {
            search_term: "BEEF".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(apply_filters(&records, &by_hash).len(), 1);

        let by_own_address = FilterCriteria {
            search_term: "0xme".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(apply_filters(&records, &by_own_address).len(), 2);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let records = numbered(3);
        let criteria = FilterCriteria {
            search_term: "   ".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(apply_filters(&records, &criteria), records);
    }

    #[test]
    fn test_filtering_is_deterministic() {
        let records = vec![
            record("0x01", TransactionKind::Sent, "0xaa"),
            record("0x02", TransactionKind::Received, "0xab"),
            record("0x03", TransactionKind::Sent, "0xac"),
        ];
        let criteria = FilterCriteria {
            type_filter: TypeFilter::Sent,
            search_term: "0xa".to_string(),
        };
        assert_eq!(apply_filters(&records, &criteria), apply_filters(&records, &criteria));
    }

    #[test]
    fn test_total_pages_never_below_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_last_page_holds_the_remainder() {
        let records = numbered(25);
        let last = page_slice(&records, 3, 10);
        assert_eq!(last.len(), 5);
        assert_eq!(last[0].hash, "0xhash20");
        assert!(page_slice(&records, 4, 10).is_empty());
    }

    #[test]
    fn test_derive_clamps_page_in_the_same_pass() {
        let records = numbered(25);
        let mut pagination = PaginationState {
            current_page: 3,
            ..PaginationState::default()
        };
        let criteria = FilterCriteria {
            search_term: "0xhash0".to_string(),
            ..FilterCriteria::default()
        };

        let view = derive(&records, &criteria, &mut pagination, false);

        assert_eq!(view.filtered.len(), 10);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(view.paged.len(), 10);
        assert!(view.paged.len() <= pagination.items_per_page);
    }
}
