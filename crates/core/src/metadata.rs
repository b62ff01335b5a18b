//! Video metadata lookups via `yt-dlp -j`.
//!
//! A single blocking call to the external tool: the JSON it prints is
//! reduced to the handful of fields the web client shows before starting a
//! download.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::args::END_OF_OPTIONS;

/// Error type for metadata lookups and version probes.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("yt-dlp binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("yt-dlp execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse yt-dlp metadata: {0}")]
    ParseError(String),
}

// ---------------------------------------------------------------------------
// yt-dlp JSON output structures
// ---------------------------------------------------------------------------

/// Subset of the `yt-dlp -j` document we care about.
#[derive(Debug, Deserialize)]
pub struct YtDlpInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<YtDlpFormat>>,
}

/// One entry of the `formats` array.
#[derive(Debug, Deserialize)]
pub struct YtDlpFormat {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub format_note: Option<String>,
    pub filesize: Option<u64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Metadata returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub formats: Vec<FormatInfo>,
}

/// A downloadable format of the video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatInfo {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub quality: Option<String>,
    pub filesize: Option<u64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl From<YtDlpInfo> for VideoInfo {
    fn from(info: YtDlpInfo) -> Self {
        Self {
            id: info.id,
            title: info.title,
            thumbnail: info.thumbnail,
            duration: info.duration,
            uploader: info.uploader,
            formats: info
                .formats
                .unwrap_or_default()
                .into_iter()
                .map(FormatInfo::from)
                .collect(),
        }
    }
}

impl From<YtDlpFormat> for FormatInfo {
    fn from(f: YtDlpFormat) -> Self {
        Self {
            format_id: f.format_id,
            ext: f.ext,
            quality: f.format_note,
            filesize: f.filesize,
            vcodec: f.vcodec,
            acodec: f.acodec,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Arguments for a metadata lookup: `-j -- <url>`.
pub fn video_info_args(url: &str) -> [&str; 3] {
    ["-j", END_OF_OPTIONS, url]
}

/// Run `yt-dlp -j -- <url>` and return the parsed metadata.
pub async fn fetch_video_info(binary: &Path, url: &str) -> Result<VideoInfo, MetadataError> {
    let output = tokio::process::Command::new(binary)
        .args(video_info_args(url))
        .output()
        .await
        .map_err(MetadataError::NotFound)?;

    if !output.status.success() {
        return Err(MetadataError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    parse_video_info(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the JSON document printed by `yt-dlp -j`.
pub fn parse_video_info(json: &str) -> Result<VideoInfo, MetadataError> {
    serde_json::from_str::<YtDlpInfo>(json.trim())
        .map(VideoInfo::from)
        .map_err(|e| MetadataError::ParseError(e.to_string()))
}

/// Run `yt-dlp --version`, returning the trimmed version string.
pub async fn tool_version(binary: &Path) -> Result<String, MetadataError> {
    let output = tokio::process::Command::new(binary)
        .arg("--version")
        .output()
        .await
        .map_err(MetadataError::NotFound)?;

    if !output.status.success() {
        return Err(MetadataError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
