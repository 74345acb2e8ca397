//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Operation-surface error for the inventory ledger.
///
/// Every variant carries enough context (batch id, line number, expected vs.
/// actual) for the caller to render an actionable message.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A value failed validation (malformed input, header mismatch, empty payload).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A persisted or imported row could not be decoded.
    #[error("malformed record at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// No entry with the given batch number exists.
    #[error("no medicine with batch {batch}")]
    NotFound { batch: String },

    /// An entry with the given batch number already exists.
    #[error("batch {batch} already exists")]
    DuplicateBatch { batch: String },

    /// A sale would drive the on-hand quantity negative.
    #[error("insufficient stock for batch {batch}: requested {requested}, available {available}")]
    InsufficientStock {
        batch: String,
        requested: u32,
        available: u32,
    },

    /// Underlying file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(line: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            line,
            reason: reason.into(),
        }
    }

    pub fn not_found(batch: impl Into<String>) -> Self {
        Self::NotFound {
            batch: batch.into(),
        }
    }

    pub fn duplicate_batch(batch: impl Into<String>) -> Self {
        Self::DuplicateBatch {
            batch: batch.into(),
        }
    }
}
