use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create file sharing routes
pub fn share_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Listing pages
        .route("/", get(handlers::index))
        .route("/browse", get(handlers::browse))
        // Downloads
        .route("/download", get(handlers::download))
        .route("/download/:filename", get(handlers::download_named))
}
