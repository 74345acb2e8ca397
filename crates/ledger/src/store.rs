//! The durable inventory ledger.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use medstock_core::{LedgerError, LedgerResult};

use crate::audit::AuditLog;
use crate::codec;
use crate::entry::{MedicineEntry, NewMedicine};

/// File name of the live ledger inside the data directory.
pub const LEDGER_FILE: &str = "inventory.txt";

/// File name of the transaction history inside the data directory.
pub const AUDIT_FILE: &str = "history.txt";

/// Receipt for a completed sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    pub quantity: u32,
    pub total: f64,
    /// Entry state after the sale.
    pub entry: MedicineEntry,
}

/// File-backed record store keyed by batch number.
///
/// Owns its data directory exclusively: the live ledger, the audit log and
/// restore backups all live beneath it. Every mutating operation runs the
/// same sequence: load the snapshot, mutate it in memory, append the audit
/// record, persist the full snapshot. Single-writer by design; callers that
/// share the store across request handlers must serialize operations behind
/// one mutex.
#[derive(Debug)]
pub struct LedgerStore {
    data_dir: PathBuf,
    ledger_path: PathBuf,
    audit: AuditLog,
}

impl LedgerStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> LedgerResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let ledger_path = data_dir.join(LEDGER_FILE);
        let audit = AuditLog::new(data_dir.join(AUDIT_FILE));
        Ok(Self {
            data_dir,
            ledger_path,
            audit,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The transaction history attached to this ledger.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Load the full snapshot.
    ///
    /// A row that fails to decode is a fatal load error carrying its
    /// 1-based line number: a corrupted row could mask true stock levels,
    /// so nothing is silently dropped. A missing file is an empty ledger;
    /// blank lines are skipped.
    pub fn load(&self) -> LedgerResult<Vec<MedicineEntry>> {
        if !self.ledger_path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.ledger_path)?;
        let mut entries = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry =
                codec::decode(line).map_err(|e| LedgerError::decode(i + 1, e.to_string()))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Persist the full replacement snapshot in one pass.
    ///
    /// Writes to a temporary file in the data directory and renames it over
    /// the live ledger, so a reader never observes a partially written set.
    pub fn save(&self, entries: &[MedicineEntry]) -> LedgerResult<()> {
        let mut contents = String::new();
        for entry in entries {
            contents.push_str(&codec::encode(entry));
            contents.push('\n');
        }
        let tmp = self.data_dir.join(format!("{LEDGER_FILE}.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.ledger_path)?;
        Ok(())
    }

    /// Look up one entry by batch number.
    pub fn find(&self, batch: &str) -> LedgerResult<Option<MedicineEntry>> {
        Ok(self.load()?.into_iter().find(|e| e.batch() == batch))
    }

    /// Record a new batch. The baseline quantity starts equal to the
    /// on-hand quantity.
    pub fn add(&self, new: NewMedicine) -> LedgerResult<MedicineEntry> {
        let entry = MedicineEntry::new(new)?;
        let mut entries = self.load()?;
        if entries.iter().any(|e| e.batch() == entry.batch()) {
            return Err(LedgerError::duplicate_batch(entry.batch()));
        }
        self.audit.append(&format!(
            "Added medicine: {} ({}), qty={}, price={}",
            entry.name(),
            entry.batch(),
            entry.quantity(),
            entry.price(),
        ))?;
        entries.push(entry.clone());
        self.save(&entries)?;
        info!(batch = entry.batch(), quantity = entry.quantity(), "added medicine");
        Ok(entry)
    }

    /// Overwrite the on-hand quantity and expiry of one batch. The baseline
    /// quantity is left untouched.
    pub fn update_stock(
        &self,
        batch: &str,
        quantity: u32,
        expiry: NaiveDate,
    ) -> LedgerResult<MedicineEntry> {
        let mut entries = self.load()?;
        let entry = find_mut(&mut entries, batch)?;
        entry.set_quantity(quantity);
        entry.set_expiry(expiry);
        let updated = entry.clone();
        self.audit.append(&format!(
            "Updated medicine: {} ({}), new qty={}",
            updated.name(),
            updated.batch(),
            updated.quantity(),
        ))?;
        self.save(&entries)?;
        Ok(updated)
    }

    /// Sell `quantity` units from one batch and return the receipt.
    ///
    /// A sale that would drive the on-hand quantity negative is rejected
    /// with the requested and available amounts; the ledger is untouched.
    pub fn buy(&self, batch: &str, quantity: u32) -> LedgerResult<Purchase> {
        let mut entries = self.load()?;
        let entry = find_mut(&mut entries, batch)?;
        if quantity > entry.quantity() {
            return Err(LedgerError::InsufficientStock {
                batch: batch.to_string(),
                requested: quantity,
                available: entry.quantity(),
            });
        }
        entry.set_quantity(entry.quantity() - quantity);
        let total = f64::from(quantity) * entry.price();
        let sold = entry.clone();
        self.audit.append(&format!(
            "Bought {} of {} ({}), total={}",
            quantity,
            sold.name(),
            sold.batch(),
            total,
        ))?;
        self.save(&entries)?;
        info!(batch, quantity, total, "recorded sale");
        Ok(Purchase {
            quantity,
            total,
            entry: sold,
        })
    }

    /// Extend one batch's on-hand quantity, optionally moving its expiry.
    /// The baseline quantity is not reset (contrast with [`LedgerStore::add`]).
    pub fn restock(
        &self,
        batch: &str,
        added: u32,
        new_expiry: Option<NaiveDate>,
    ) -> LedgerResult<MedicineEntry> {
        let mut entries = self.load()?;
        let entry = find_mut(&mut entries, batch)?;
        let quantity = entry
            .quantity()
            .checked_add(added)
            .ok_or_else(|| LedgerError::validation("restocked quantity exceeds the supported range"))?;
        entry.set_quantity(quantity);
        if let Some(expiry) = new_expiry {
            entry.set_expiry(expiry);
        }
        let updated = entry.clone();
        let expiry_note = match new_expiry {
            Some(d) => d.format(codec::DATE_FORMAT).to_string(),
            None => "unchanged".to_string(),
        };
        self.audit.append(&format!(
            "Restocked medicine: {} ({}), added qty={}, new total={}, new expiry={}",
            updated.name(),
            updated.batch(),
            added,
            updated.quantity(),
            expiry_note,
        ))?;
        self.save(&entries)?;
        Ok(updated)
    }

    /// Zero out every expired batch that still shows stock, returning the
    /// count mutated.
    ///
    /// Entries already at zero are left untouched, so a second call right
    /// after the first reports zero mutations. Expired rows are kept, not
    /// deleted: their history stays visible.
    pub fn mark_expired_out_of_stock(&self, today: NaiveDate) -> LedgerResult<usize> {
        let mut entries = self.load()?;
        let mut marked = 0;
        for entry in entries.iter_mut() {
            if !entry.is_expired(today) || entry.quantity() == 0 {
                continue;
            }
            self.audit.append(&format!(
                "Marked as expired (qty set to 0): {} ({}), previous qty={}",
                entry.name(),
                entry.batch(),
                entry.quantity(),
            ))?;
            entry.set_quantity(0);
            marked += 1;
        }
        self.save(&entries)?;
        if marked > 0 {
            info!(marked, "marked expired medicines out of stock");
        }
        Ok(marked)
    }
}

fn find_mut<'a>(
    entries: &'a mut [MedicineEntry],
    batch: &str,
) -> LedgerResult<&'a mut MedicineEntry> {
    entries
        .iter_mut()
        .find(|e| e.batch() == batch)
        .ok_or_else(|| LedgerError::not_found(batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid test date")
    }

    fn test_store() -> (TempDir, LedgerStore) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = LedgerStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn paracetamol() -> NewMedicine {
        NewMedicine {
            name: "Paracetamol".to_string(),
            batch: "B1".to_string(),
            expiry: date("2030-01-01"),
            quantity: 100,
            price: 2.5,
        }
    }

    fn aspirin_expired() -> NewMedicine {
        NewMedicine {
            name: "Aspirin".to_string(),
            batch: "B2".to_string(),
            expiry: date("2000-01-01"),
            quantity: 5,
            price: 1.0,
        }
    }

    #[test]
    fn add_creates_entry_with_baseline_quantity() {
        let (_dir, store) = test_store();

        let entry = store.add(paracetamol()).unwrap();
        assert_eq!(entry.quantity(), 100);
        assert_eq!(entry.original_quantity(), 100);

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], entry);
    }

    #[test]
    fn add_rejects_duplicate_batch() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();

        let err = store.add(paracetamol()).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateBatch { batch } if batch == "B1"));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn buy_decrements_stock_and_returns_total() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();

        let purchase = store.buy("B1", 30).unwrap();
        assert_eq!(purchase.total, 75.0);
        assert_eq!(purchase.entry.quantity(), 70);
        assert_eq!(store.find("B1").unwrap().unwrap().quantity(), 70);
    }

    #[test]
    fn oversell_is_rejected_and_stock_unchanged() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();
        store.buy("B1", 30).unwrap();

        let err = store.buy("B1", 1000).unwrap_err();
        match err {
            LedgerError::InsufficientStock {
                batch,
                requested,
                available,
            } => {
                assert_eq!(batch, "B1");
                assert_eq!(requested, 1000);
                assert_eq!(available, 70);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(store.find("B1").unwrap().unwrap().quantity(), 70);
    }

    #[test]
    fn buy_of_unknown_batch_fails() {
        let (_dir, store) = test_store();
        let err = store.buy("NOPE", 1).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { batch } if batch == "NOPE"));
    }

    #[test]
    fn sales_and_restocks_leave_baseline_untouched() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();

        store.buy("B1", 30).unwrap();
        let entry = store.restock("B1", 50, None).unwrap();

        assert_eq!(entry.quantity(), 120);
        assert_eq!(entry.original_quantity(), 100);
    }

    #[test]
    fn restock_moves_expiry_when_given() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();

        let entry = store.restock("B1", 10, Some(date("2031-06-01"))).unwrap();
        assert_eq!(entry.expiry(), date("2031-06-01"));

        let entry = store.restock("B1", 10, None).unwrap();
        assert_eq!(entry.expiry(), date("2031-06-01"));
    }

    #[test]
    fn restock_of_unknown_batch_fails() {
        let (_dir, store) = test_store();
        let err = store.restock("NOPE", 10, None).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn update_stock_overwrites_quantity_and_expiry() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();

        let entry = store.update_stock("B1", 42, date("2032-01-01")).unwrap();
        assert_eq!(entry.quantity(), 42);
        assert_eq!(entry.expiry(), date("2032-01-01"));
        assert_eq!(entry.original_quantity(), 100);
    }

    #[test]
    fn update_stock_of_unknown_batch_fails() {
        let (_dir, store) = test_store();
        let err = store.update_stock("NOPE", 1, date("2032-01-01")).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn mark_expired_zeroes_stock_once() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();
        store.add(aspirin_expired()).unwrap();

        let marked = store.mark_expired_out_of_stock(date("2024-06-01")).unwrap();
        assert_eq!(marked, 1);
        assert_eq!(store.find("B2").unwrap().unwrap().quantity(), 0);
        assert_eq!(store.find("B1").unwrap().unwrap().quantity(), 100);

        let marked = store.mark_expired_out_of_stock(date("2024-06-01")).unwrap();
        assert_eq!(marked, 0);
    }

    #[test]
    fn mark_expired_keeps_the_row() {
        let (_dir, store) = test_store();
        store.add(aspirin_expired()).unwrap();

        store.mark_expired_out_of_stock(date("2024-06-01")).unwrap();
        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].batch(), "B2");
    }

    #[test]
    fn load_fails_on_a_corrupt_row() {
        let (dir, store) = test_store();
        store.add(paracetamol()).unwrap();
        let path = dir.path().join(LEDGER_FILE);
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("garbage line\n");
        fs::write(&path, raw).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, LedgerError::Decode { line: 2, .. }));
    }

    #[test]
    fn load_skips_blank_lines() {
        let (dir, store) = test_store();
        fs::write(
            dir.path().join(LEDGER_FILE),
            "Paracetamol,B1,2030-01-01,100,2.5,100\n\nAspirin,B2,2030-01-01,5,1,5\n",
        )
        .unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn load_of_missing_file_is_empty() {
        let (_dir, store) = test_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = test_store();
        let entries = vec![
            MedicineEntry::new(paracetamol()).unwrap(),
            MedicineEntry::new(aspirin_expired()).unwrap(),
        ];

        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn every_mutation_is_audited() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();
        store.buy("B1", 30).unwrap();
        store.restock("B1", 10, None).unwrap();

        let records = store.audit().read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].message.starts_with("Added medicine: Paracetamol (B1)"));
        assert!(records[1].message.starts_with("Bought 30 of Paracetamol (B1)"));
        assert!(records[2].message.starts_with("Restocked medicine: Paracetamol (B1)"));
    }

    #[test]
    fn rejected_operations_are_not_audited() {
        let (_dir, store) = test_store();
        store.add(paracetamol()).unwrap();
        let before = store.audit().read_all().unwrap().len();

        let _ = store.buy("B1", 1000).unwrap_err();
        let _ = store.add(paracetamol()).unwrap_err();

        assert_eq!(store.audit().read_all().unwrap().len(), before);
    }
}
