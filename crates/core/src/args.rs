//! `yt-dlp` argument construction.
//!
//! Two modes are supported: audio extraction (`format == "mp3"`) and
//! height-bounded video. Every invocation disables playlists, writes into
//! the downloads directory using the `%(title)s.%(ext)s` template, skips
//! certificate checks and puts the target URL last, after a `--` so it is
//! never read as an option.

use std::path::Path;

use serde::Deserialize;

/// Format selector that switches the tool into audio extraction mode.
pub const FORMAT_AUDIO: &str = "mp3";

/// Audio codec requested in extraction mode.
pub const AUDIO_CODEC: &str = "mp3";

/// Marks the end of options; the URL always follows it.
pub const END_OF_OPTIONS: &str = "--";

/// Video height used when the quality hint is missing or unusable.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

/// Output file template, relative to the downloads directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Parameters of a download request.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, format: Option<&str>, quality: Option<&str>) -> Self {
        Self {
            url: url.into(),
            format: format.map(str::to_string),
            quality: quality.map(str::to_string),
        }
    }

    pub fn is_audio(&self) -> bool {
        self.format.as_deref() == Some(FORMAT_AUDIO)
    }
}

/// Build the full argument vector for one download.
pub fn build_args(request: &DownloadRequest, downloads_dir: &Path) -> Vec<String> {
    let template = downloads_dir.join(OUTPUT_TEMPLATE);

    let mut args = vec![
        "--no-playlist".to_string(),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--no-check-certificate".to_string(),
    ];

    if request.is_audio() {
        args.extend(["--extract-audio", "--audio-format", AUDIO_CODEC].map(String::from));
        if let Some(bitrate) = request.quality.as_deref().and_then(audio_bitrate) {
            args.push("--audio-quality".to_string());
            args.push(bitrate);
        }
    } else {
        let height = video_height(request.quality.as_deref());
        args.push("--format".to_string());
        args.push(video_format_expression(height));
    }

    args.push(END_OF_OPTIONS.to_string());
    args.push(request.url.clone());
    args
}

/// `"192kbps"` -> `"192"`. Blank hints produce no flag.
fn audio_bitrate(hint: &str) -> Option<String> {
    let bitrate = hint.replace("kbps", "");
    let bitrate = bitrate.trim();
    (!bitrate.is_empty()).then(|| bitrate.to_string())
}

/// Parse a `"1080p"` style hint into a height.
///
/// Only leading digits count (`"1080p60"` is 1080). Missing, unparseable or
/// zero hints fall back to [`DEFAULT_VIDEO_HEIGHT`].
pub fn video_height(hint: Option<&str>) -> u32 {
    let Some(hint) = hint else {
        return DEFAULT_VIDEO_HEIGHT;
    };
    let digits: String = hint
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(height) if height > 0 => height,
        _ => DEFAULT_VIDEO_HEIGHT,
    }
}

/// `bestvideo[height<=H]+bestaudio/best`
pub fn video_format_expression(height: u32) -> String {
    format!("bestvideo[height<={height}]+bestaudio/best")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
