//! API routes for the DeCert server.

pub mod certificates;
pub mod mint;
pub mod verify;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Creates the main API router with all routes mounted.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state))
        .layer(TraceLayer::new_for_http())
        // The browser frontend is served from a separate origin.
        .layer(CorsLayer::permissive())
}

/// Creates the v1 API routes.
fn api_v1_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(
            "/certificates",
            certificates::router(state.clone()).merge(mint::router(state.clone())),
        )
        .nest("/verify", verify::router(state))
}
