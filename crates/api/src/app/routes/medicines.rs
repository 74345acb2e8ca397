use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;

use medstock_ledger::{NewMedicine, StockLine, reports};

use crate::app::{AppState, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_medicines).post(add_medicine))
        .route("/mark-expired", post(mark_expired))
        .route("/:batch", get(get_medicine))
        .route("/:batch/update", post(update_stock))
        .route("/:batch/buy", post(buy))
        .route("/:batch/restock", post(restock))
}

pub async fn list_medicines(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    let today = Local::now().date_naive();
    match state.with_store(|s| s.load()) {
        Ok(snapshot) => Json(reports::overview(&snapshot, today)).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn get_medicine(
    Extension(state): Extension<Arc<AppState>>,
    Path(batch): Path<String>,
) -> axum::response::Response {
    let today = Local::now().date_naive();
    match state.with_store(|s| s.find(&batch)) {
        Ok(Some(entry)) => Json(StockLine::new(entry, today)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no medicine with batch {batch}"),
        ),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn add_medicine(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::AddMedicineRequest>,
) -> axum::response::Response {
    let new = NewMedicine {
        name: body.name,
        batch: body.batch,
        expiry: body.expiry,
        quantity: body.quantity,
        price: body.price,
    };
    match state.with_store(|s| s.add(new)) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn update_stock(
    Extension(state): Extension<Arc<AppState>>,
    Path(batch): Path<String>,
    Json(body): Json<dto::UpdateStockRequest>,
) -> axum::response::Response {
    match state.with_store(|s| s.update_stock(&batch, body.quantity, body.expiry)) {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn buy(
    Extension(state): Extension<Arc<AppState>>,
    Path(batch): Path<String>,
    Json(body): Json<dto::BuyRequest>,
) -> axum::response::Response {
    match state.with_store(|s| s.buy(&batch, body.quantity)) {
        Ok(purchase) => Json(purchase).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn restock(
    Extension(state): Extension<Arc<AppState>>,
    Path(batch): Path<String>,
    Json(body): Json<dto::RestockRequest>,
) -> axum::response::Response {
    match state.with_store(|s| s.restock(&batch, body.quantity, body.expiry)) {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn mark_expired(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    let today = Local::now().date_naive();
    match state.with_store(|s| s.mark_expired_out_of_stock(today)) {
        Ok(marked) => Json(serde_json::json!({ "marked": marked })).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}
