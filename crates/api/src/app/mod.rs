//! HTTP application wiring (axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and query parameters
//! - `errors.rs`: consistent error responses

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{Extension, Router, routing::get};

use medstock_core::LedgerResult;
use medstock_ledger::LedgerStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared application state: the ledger store behind one mutex, so every
/// load→mutate→persist sequence runs as a single critical section.
#[derive(Debug)]
pub struct AppState {
    store: Mutex<LedgerStore>,
}

impl AppState {
    /// Open the backing store rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> LedgerResult<Self> {
        Ok(Self {
            store: Mutex::new(LedgerStore::open(data_dir)?),
        })
    }

    /// Run one operation while holding the store lock.
    pub fn with_store<T>(&self, op: impl FnOnce(&LedgerStore) -> T) -> T {
        let store = self.store.lock().unwrap();
        op(&store)
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(state))
}
