use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::Extension,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;

use crate::app::{AppState, errors};

pub fn router() -> Router {
    Router::new()
        .route("/export", get(export))
        .route("/restore", post(restore))
}

pub async fn export(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.with_store(|s| s.export(Local::now())) {
        Ok(payload) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", payload.filename),
                ),
            ],
            payload.content,
        )
            .into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}

pub async fn restore(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> axum::response::Response {
    match state.with_store(|s| s.restore(&body, Local::now())) {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::ledger_error_response(e),
    }
}
