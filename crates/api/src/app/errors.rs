use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use medstock_core::LedgerError;

/// Map a ledger failure onto a status code + JSON error body.
pub fn ledger_error_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        LedgerError::Decode { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "malformed_record", message)
        }
        LedgerError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
        LedgerError::DuplicateBatch { .. } => {
            json_error(StatusCode::CONFLICT, "duplicate_batch", message)
        }
        LedgerError::InsufficientStock { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", message)
        }
        LedgerError::Io(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
