pub mod downloads;
pub mod health;
pub mod root;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                          service health
/// /video-info                      metadata lookup (POST)
/// /download                        start a download (POST)
/// /download/{id}/progress          poll a download
/// /downloads                       list (GET), delete all (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(downloads::router())
}
