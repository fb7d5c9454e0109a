//! HTTP server for generated faces.
//!
//! Thin layer over [`FaceGenerator`]: every request derives its face from
//! the query string, nothing is stored between requests.

pub mod routes;

pub use routes::{app_router, AppState};

use thiserror::Error;
use tracing::info;

use crate::generator::FaceGenerator;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {0}: {1}")]
    Bind(String, std::io::Error),

    #[error("Server failed: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Failed to fingerprint catalog: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Bind `bind_addr` and serve until the process is stopped.
pub async fn serve(bind_addr: &str, generator: FaceGenerator) -> Result<(), ServerError> {
    let state = AppState::new(generator)?;
    info!(catalog = %state.catalog_fingerprint, "catalog loaded");

    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| ServerError::Bind(bind_addr.to_string(), e))?;

    info!("faces server starting on {}", bind_addr);
    info!("  GET /face.svg?seed=...  — face for a seed");
    info!("  GET /random             — random face page");
    info!("  GET /                   — gallery");

    axum::serve(listener, app).await?;
    Ok(())
}
