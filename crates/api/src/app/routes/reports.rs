use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
};
use chrono::Local;

use medstock_ledger::{DEFAULT_LOW_STOCK_THRESHOLD, reports};

use crate::app::{AppState, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/expired", get(expired))
        .route("/low-stock", get(low_stock))
}

pub async fn expired(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    let today = Local::now().date_naive();
    match state.with_store(|s| s.load()) {
        Ok(snapshot) => Json(reports::expired(&snapshot, today)).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn low_stock(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<dto::LowStockParams>,
) -> axum::response::Response {
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    match state.with_store(|s| s.load()) {
        Ok(snapshot) => Json(reports::low_stock(&snapshot, threshold)).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}
