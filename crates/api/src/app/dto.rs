//! Request DTOs and query parameters.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddMedicineRequest {
    pub name: String,
    pub batch: String,
    pub expiry: NaiveDate,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: u32,
    pub expiry: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: u32,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    pub threshold: Option<u32>,
}
