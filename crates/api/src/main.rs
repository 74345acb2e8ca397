use std::sync::Arc;

use medstock_api::app::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medstock_observability::init();

    let data_dir = std::env::var("MEDSTOCK_DATA_DIR").unwrap_or_else(|_| {
        tracing::warn!("MEDSTOCK_DATA_DIR not set; using ./data");
        "./data".to_string()
    });
    let addr =
        std::env::var("MEDSTOCK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let state = Arc::new(AppState::open(data_dir)?);
    let app = app::build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
