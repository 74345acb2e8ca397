use chrono::NaiveDate;
use serde::Serialize;

use medstock_core::{LedgerError, LedgerResult};

use crate::codec::{DELIMITER, DecodeError};

/// Input for recording a new batch.
#[derive(Debug, Clone)]
pub struct NewMedicine {
    pub name: String,
    pub batch: String,
    pub expiry: NaiveDate,
    pub quantity: u32,
    pub price: f64,
}

/// One batch of medicine in the ledger.
///
/// `batch` is the sole identity; fields are private so state changes only
/// happen through the store's operations. The baseline quantity
/// (`original_quantity`) is fixed at creation and never touched by sales or
/// ordinary restocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineEntry {
    name: String,
    batch: String,
    expiry: NaiveDate,
    quantity: u32,
    price: f64,
    original_quantity: u32,
}

impl MedicineEntry {
    /// Record a fresh batch. The baseline quantity starts equal to the
    /// on-hand quantity.
    pub fn new(new: NewMedicine) -> LedgerResult<Self> {
        Self::from_parts(
            new.name,
            new.batch,
            new.expiry,
            new.quantity,
            new.price,
            new.quantity,
        )
        .map_err(|e| LedgerError::validation(e.to_string()))
    }

    /// Build an entry from already-parsed parts, enforcing the construction
    /// invariants: non-empty name and batch, no delimiter or line break in
    /// text fields, finite non-negative price.
    pub fn from_parts(
        name: impl Into<String>,
        batch: impl Into<String>,
        expiry: NaiveDate,
        quantity: u32,
        price: f64,
        original_quantity: u32,
    ) -> Result<Self, DecodeError> {
        let name = name.into().trim().to_string();
        let batch = batch.into().trim().to_string();
        for (field, value) in [("name", &name), ("batch", &batch)] {
            if value.is_empty() {
                return Err(DecodeError::EmptyField(field));
            }
            if value.contains(DELIMITER) || value.contains('\n') || value.contains('\r') {
                return Err(DecodeError::InvalidText(field));
            }
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DecodeError::InvalidPrice(price.to_string()));
        }
        Ok(Self {
            name,
            batch,
            expiry,
            quantity,
            price,
            original_quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn original_quantity(&self) -> u32 {
        self.original_quantity
    }

    /// An entry is expired iff its expiry date lies strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry < today
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_expiry(&mut self, expiry: NaiveDate) {
        self.expiry = expiry;
    }
}
