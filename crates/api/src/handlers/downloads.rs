//! Handlers for starting downloads, polling their progress and managing
//! the files they produce.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ytgrab_core::args::DownloadRequest;
use ytgrab_core::job::Job;
use ytgrab_core::library::{self, StoredFile};
use ytgrab_core::types::JobId;

use super::require_url;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// Body of `POST /download`.
#[derive(Debug, Deserialize)]
pub struct StartDownloadBody {
    pub url: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

/// Returned once a download has been accepted.
#[derive(Debug, Serialize)]
pub struct DownloadStarted {
    #[serde(rename = "downloadId")]
    pub download_id: JobId,
    pub status: &'static str,
}

/// Returned after the downloads directory was emptied.
#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub message: &'static str,
    pub deleted: usize,
}

// ---------------------------------------------------------------------------
// POST /download
// ---------------------------------------------------------------------------

/// Start a download in the background and return its id immediately.
pub async fn start_download(
    State(state): State<AppState>,
    AppJson(body): AppJson<StartDownloadBody>,
) -> AppResult<Json<DownloadStarted>> {
    let url = require_url(body.url)?;
    let request = DownloadRequest {
        url,
        format: body.format,
        quality: body.quality,
    };

    let download_id = state.supervisor.start_job(&request).await;

    Ok(Json(DownloadStarted {
        download_id,
        status: "started",
    }))
}

// ---------------------------------------------------------------------------
// GET /download/{id}/progress
// ---------------------------------------------------------------------------

/// Current state of one download.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Job>> {
    let job = state.status.get_status_by_key(&id).await?;
    Ok(Json(job))
}

// ---------------------------------------------------------------------------
// GET /downloads
// ---------------------------------------------------------------------------

/// List the files in the downloads directory.
pub async fn list_files(State(state): State<AppState>) -> AppResult<Json<Vec<StoredFile>>> {
    let files = library::list_files(&state.config.downloads_dir).await?;
    Ok(Json(files))
}

// ---------------------------------------------------------------------------
// DELETE /downloads
// ---------------------------------------------------------------------------

/// Delete every file in the downloads directory.
pub async fn clear_files(State(state): State<AppState>) -> AppResult<Json<ClearedResponse>> {
    let deleted = library::clear_files(&state.config.downloads_dir).await?;
    tracing::info!(deleted, "Cleared downloads directory");
    Ok(Json(ClearedResponse {
        message: "All downloaded files deleted.",
        deleted,
    }))
}
