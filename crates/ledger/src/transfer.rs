//! CSV import/export for the ledger.
//!
//! Export streams the snapshot with a fixed header row. Import is a
//! two-phase validate-then-commit pipeline: no state is touched until every
//! row has been accepted, and the previous ledger is snapshotted to a
//! timestamped backup before the overwrite.

use std::fs;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use medstock_core::{LedgerError, LedgerResult};

use crate::codec;
use crate::entry::MedicineEntry;
use crate::store::LedgerStore;

/// Mandatory header row of the export/import CSV format.
pub const CSV_HEADER: [&str; 6] = [
    "Medicine Name",
    "Batch Number",
    "Expiry Date",
    "Quantity",
    "Price",
    "Original Quantity",
];

/// A rendered export: suggested download filename plus CSV bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Result of a committed restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    pub imported: usize,
    pub backup_file: String,
}

/// Render a snapshot as CSV: the mandatory header, then one row per entry
/// in snapshot order.
pub fn export_csv(snapshot: &[MedicineEntry]) -> LedgerResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_failure)?;
    for entry in snapshot {
        writer
            .write_record(&[
                entry.name().to_string(),
                entry.batch().to_string(),
                entry.expiry().format(codec::DATE_FORMAT).to_string(),
                entry.quantity().to_string(),
                entry.price().to_string(),
                entry.original_quantity().to_string(),
            ])
            .map_err(csv_failure)?;
    }
    writer
        .into_inner()
        .map_err(|e| LedgerError::validation(format!("CSV rendering failed: {e}")))
}

/// Timestamp-embedded name for one export download.
pub fn export_filename(now: DateTime<Local>) -> String {
    format!("inventory_backup_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn backup_filename(now: DateTime<Local>) -> String {
    format!("inventory_backup_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Validate an uploaded CSV payload without touching any state.
///
/// Row numbering is 1-based over the whole payload: the header is row 1,
/// the first data row is row 2. The first failing row aborts the parse.
pub fn parse_csv(payload: &[u8]) -> LedgerResult<Vec<MedicineEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(payload);

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(record) => record
            .map_err(|e| LedgerError::validation(format!("unreadable CSV payload: {e}")))?,
        None => return Err(LedgerError::validation("CSV payload is empty")),
    };
    if header.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(LedgerError::validation(format!(
            "CSV header must be exactly {:?}, got {:?}",
            CSV_HEADER.join(","),
            header.iter().collect::<Vec<_>>().join(","),
        )));
    }

    let mut entries = Vec::new();
    for (i, record) in rows.enumerate() {
        let row = i + 2;
        let record = record.map_err(|e| {
            LedgerError::validation(format!("unreadable CSV payload at row {row}: {e}"))
        })?;
        let fields: Vec<&str> = record.iter().collect();
        let entry = codec::parse_fields(&fields)
            .map_err(|e| LedgerError::decode(row, e.to_string()))?;
        entries.push(entry);
    }
    if entries.is_empty() {
        return Err(LedgerError::validation("CSV payload contains no data rows"));
    }
    Ok(entries)
}

fn csv_failure(err: csv::Error) -> LedgerError {
    LedgerError::validation(format!("CSV rendering failed: {err}"))
}

impl LedgerStore {
    /// Render the current snapshot for download, recording the export.
    pub fn export(&self, now: DateTime<Local>) -> LedgerResult<ExportPayload> {
        let snapshot = self.load()?;
        let content = export_csv(&snapshot)?;
        self.audit().append(&format!(
            "Inventory backup downloaded - {} medicines exported",
            snapshot.len(),
        ))?;
        Ok(ExportPayload {
            filename: export_filename(now),
            content,
        })
    }

    /// Replace the ledger with a validated CSV payload.
    ///
    /// Phase one validates every row without touching any state. Phase two
    /// snapshots the current ledger to a timestamped backup, overwrites the
    /// live file, then records the import. If the overwrite is interrupted
    /// the backup still holds the previous state.
    pub fn restore(&self, payload: &[u8], now: DateTime<Local>) -> LedgerResult<RestoreOutcome> {
        let incoming = parse_csv(payload).inspect_err(|e| {
            warn!(error = %e, "rejected inventory restore");
        })?;

        let current = self.load()?;
        let backup_file = backup_filename(now);
        let mut backup = String::new();
        for entry in &current {
            backup.push_str(&codec::encode(entry));
            backup.push('\n');
        }
        fs::write(self.data_dir().join(&backup_file), backup)?;

        self.save(&incoming)?;
        self.audit().append(&format!(
            "Inventory restored from CSV - {} medicines imported (backup saved as {})",
            incoming.len(),
            backup_file,
        ))?;
        info!(imported = incoming.len(), backup = %backup_file, "inventory restored");
        Ok(RestoreOutcome {
            imported: incoming.len(),
            backup_file,
        })
    }
}
