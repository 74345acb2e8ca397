//! Reporting views over a ledger snapshot.
//!
//! Pure derivations: nothing here mutates the ledger or writes the audit
//! log. The current date is always passed in by the caller.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entry::MedicineEntry;

/// Default on-hand threshold for the low-stock view.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// One inventory row decorated with its expiry status for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    #[serde(flatten)]
    pub entry: MedicineEntry,
    pub expired: bool,
}

impl StockLine {
    pub fn new(entry: MedicineEntry, today: NaiveDate) -> Self {
        let expired = entry.is_expired(today);
        Self { entry, expired }
    }
}

/// Every entry, each flagged with its expiry status as of `today`.
pub fn overview(snapshot: &[MedicineEntry], today: NaiveDate) -> Vec<StockLine> {
    snapshot
        .iter()
        .map(|e| StockLine::new(e.clone(), today))
        .collect()
}

/// Entries whose expiry date lies strictly before `today`.
pub fn expired(snapshot: &[MedicineEntry], today: NaiveDate) -> Vec<MedicineEntry> {
    snapshot
        .iter()
        .filter(|e| e.is_expired(today))
        .cloned()
        .collect()
}

/// Entries at or below the given on-hand threshold.
pub fn low_stock(snapshot: &[MedicineEntry], threshold: u32) -> Vec<MedicineEntry> {
    snapshot
        .iter()
        .filter(|e| e.quantity() <= threshold)
        .cloned()
        .collect()
}
