//! One-line text codec for ledger records.
//!
//! Row shape: `name,batch,expiry,quantity,price,original_quantity`. Six
//! comma-delimited fields, no header, no escaping. Text fields must not
//! contain the delimiter (enforced at entry construction, which keeps
//! encoding infallible). Pure string handling, no I/O.

use chrono::NaiveDate;
use thiserror::Error;

use crate::entry::MedicineEntry;

/// Field delimiter for persisted rows.
pub const DELIMITER: char = ',';

/// Number of fields in one persisted row.
pub const RECORD_FIELDS: usize = 6;

/// Date format used for the expiry field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Failure to decode one persisted or imported row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Row does not have exactly six delimited fields.
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    /// A text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A text field contains the delimiter or a line break.
    #[error("{0} must not contain ',' or a line break")]
    InvalidText(&'static str),

    /// The expiry field is not a calendar date.
    #[error("invalid expiry date {0:?}, expected YYYY-MM-DD")]
    InvalidExpiry(String),

    /// A count field is not a non-negative integer.
    #[error("invalid {field}: {value:?} is not a non-negative integer")]
    InvalidQuantity {
        field: &'static str,
        value: String,
    },

    /// The price field is not a non-negative number.
    #[error("invalid price: {0:?} is not a non-negative number")]
    InvalidPrice(String),
}

/// Encode one entry as a persisted row (no trailing newline).
pub fn encode(entry: &MedicineEntry) -> String {
    format!(
        "{},{},{},{},{},{}",
        entry.name(),
        entry.batch(),
        entry.expiry().format(DATE_FORMAT),
        entry.quantity(),
        entry.price(),
        entry.original_quantity(),
    )
}

/// Decode one persisted row.
pub fn decode(line: &str) -> Result<MedicineEntry, DecodeError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    parse_fields(&fields)
}

/// Parse six raw field values into an entry, enforcing the codec's
/// constraints. Shared between row decoding and CSV import validation.
pub fn parse_fields(fields: &[&str]) -> Result<MedicineEntry, DecodeError> {
    if fields.len() != RECORD_FIELDS {
        return Err(DecodeError::FieldCount(fields.len()));
    }
    let expiry = parse_date(fields[2])?;
    let quantity = parse_count("quantity", fields[3])?;
    let price = parse_price(fields[4])?;
    let original_quantity = parse_count("original quantity", fields[5])?;
    MedicineEntry::from_parts(fields[0], fields[1], expiry, quantity, price, original_quantity)
}

fn parse_date(raw: &str) -> Result<NaiveDate, DecodeError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| DecodeError::InvalidExpiry(raw.to_string()))
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, DecodeError> {
    let raw = raw.trim();
    raw.parse::<u32>().map_err(|_| DecodeError::InvalidQuantity {
        field,
        value: raw.to_string(),
    })
}

fn parse_price(raw: &str) -> Result<f64, DecodeError> {
    let raw = raw.trim();
    let price = raw
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidPrice(raw.to_string()))?;
    if !price.is_finite() || price < 0.0 {
        return Err(DecodeError::InvalidPrice(raw.to_string()));
    }
    Ok(price)
}
