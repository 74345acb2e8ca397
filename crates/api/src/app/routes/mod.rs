use axum::Router;

pub mod backup;
pub mod history;
pub mod medicines;
pub mod reports;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/medicines", medicines::router())
        .nest("/reports", reports::router())
        .nest("/history", history::router())
        .nest("/backup", backup::router())
}
