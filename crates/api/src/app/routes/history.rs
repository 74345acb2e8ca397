use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Local;

use medstock_core::LedgerResult;

use crate::app::{AppState, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_history))
        .route("/download", get(download_history))
}

pub async fn list_history(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.with_store(|s| s.audit().read_all()) {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn download_history(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    let result = state.with_store(|s| -> LedgerResult<String> {
        let raw = s.audit().raw()?;
        if !raw.is_empty() {
            s.audit().append("Transaction history backup downloaded")?;
        }
        Ok(raw)
    });
    match result {
        Ok(raw) if raw.is_empty() => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "no transaction history recorded yet",
        ),
        Ok(raw) => {
            let filename = format!("history_backup_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
            (
                [
                    (header::CONTENT_TYPE, "text/plain".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={filename}"),
                    ),
                ],
                raw,
            )
                .into_response()
        }
        Err(e) => errors::ledger_error_response(e),
    }
}
