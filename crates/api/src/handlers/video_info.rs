use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use ytgrab_core::metadata::{self, VideoInfo};

use super::require_url;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoInfoBody {
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /video-info
// ---------------------------------------------------------------------------

/// Look up title, thumbnail and available formats for a URL.
pub async fn get_video_info(
    State(state): State<AppState>,
    AppJson(body): AppJson<VideoInfoBody>,
) -> AppResult<Json<VideoInfo>> {
    let url = require_url(body.url)?;
    let info = metadata::fetch_video_info(&state.config.ytdlp_bin, &url).await?;
    Ok(Json(info))
}
