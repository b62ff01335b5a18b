//! Route definitions for downloads, progress polling and the file library.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{downloads, video_info};
use crate::state::AppState;

/// Download routes.
///
/// ```text
/// POST   /video-info                -> video_info::get_video_info
/// POST   /download                  -> start_download
/// GET    /download/{id}/progress    -> get_progress
/// GET    /downloads                 -> list_files
/// DELETE /downloads                 -> clear_files
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/video-info", post(video_info::get_video_info))
        .route("/download", post(downloads::start_download))
        .route("/download/{id}/progress", get(downloads::get_progress))
        .route(
            "/downloads",
            get(downloads::list_files).delete(downloads::clear_files),
        )
}
