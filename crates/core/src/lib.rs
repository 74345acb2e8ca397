//! `medstock-core` — shared domain foundation.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;

pub use error::{LedgerError, LedgerResult};
