//! `medstock-ledger` — the pharmacy inventory ledger.
//!
//! A file-backed record store keyed by batch number: audited mutations,
//! expiry-aware reporting views, and a validate-then-commit CSV
//! import/export pipeline.

pub mod audit;
pub mod codec;
pub mod entry;
pub mod reports;
pub mod store;
pub mod transfer;

pub use audit::{AuditLog, AuditRecord};
pub use codec::DecodeError;
pub use entry::{MedicineEntry, NewMedicine};
pub use reports::{DEFAULT_LOW_STOCK_THRESHOLD, StockLine};
pub use store::{LedgerStore, Purchase};
pub use transfer::{ExportPayload, RestoreOutcome};
