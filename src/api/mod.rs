//! REST API over the sizing core.
//!
//! Endpoints:
//! - `GET /sizing` - sizing report for the loaded scenario
//! - `POST /sizing` - sizing report for a JSON request body
//! - `GET /autonomy` - autonomy table for the loaded scenario
//! - `POST /autonomy` - autonomy table for a JSON request body

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ScenarioConfig;

pub use types::{AutonomyRequest, ErrorResponse, SizingRequest, SizingResponse};

/// Immutable application state shared across all request handlers.
///
/// Holds the scenario loaded at startup; every request recomputes from it,
/// so no locks are needed.
pub struct AppState {
    /// Validated scenario used by the `GET` endpoints.
    pub scenario: ScenarioConfig,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/sizing",
            get(handlers::get_sizing).post(handlers::post_sizing),
        )
        .route(
            "/autonomy",
            get(handlers::get_autonomy).post(handlers::post_autonomy),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
