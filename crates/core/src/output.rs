//! Line classifier for `yt-dlp` standard output.
//!
//! `yt-dlp` prints human-oriented status lines such as
//!
//! ```text
//! [download] Destination: /srv/downloads/My Song.webm
//! [download]  42.5% of 10.00MiB at 1.20MiB/s ETA 00:05
//! ```
//!
//! [`classify_line`] turns one such line into an [`OutputEvent`]. Anything
//! it does not recognise is [`OutputEvent::NoOp`]; classification never fails.

use std::sync::LazyLock;

use regex::Regex;

/// Marker present on every download progress line.
pub const PROGRESS_MARKER: &str = "[download]";

/// Marker preceding the output path of a file being written.
pub const DESTINATION_MARKER: &str = "Destination:";

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}\.\d)%").expect("valid regex"));

static DESTINATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Destination:\s(.+)").expect("valid regex"));

/// Result of classifying a single output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Download progress, already rounded to a whole percent (0..=100).
    Progress { percent: u8 },
    /// The file name (no directories) the tool is writing to.
    Destination { filename: String },
    /// Nothing of interest on this line.
    NoOp,
}

/// Classify one line of `yt-dlp` stdout.
///
/// Progress wins when a line carries both markers.
pub fn classify_line(line: &str) -> OutputEvent {
    if let Some(percent) = parse_progress(line) {
        return OutputEvent::Progress { percent };
    }
    if let Some(filename) = parse_destination(line) {
        return OutputEvent::Destination { filename };
    }
    OutputEvent::NoOp
}

/// Extract a rounded progress percentage from a `[download]` line.
fn parse_progress(line: &str) -> Option<u8> {
    if !line.contains(PROGRESS_MARKER) {
        return None;
    }
    let caps = PERCENT_RE.captures(line)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(round_percent(value))
}

/// Round half-up to a whole percent, clamped to 100.
pub fn round_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Extract the bare file name from a `Destination:` line.
fn parse_destination(line: &str) -> Option<String> {
    if !line.contains(DESTINATION_MARKER) {
        return None;
    }
    let caps = DESTINATION_RE.captures(line)?;
    base_name(caps.get(1)?.as_str().trim())
}

/// Last path component, accepting both `/` and `\` as separators.
fn base_name(path: &str) -> Option<String> {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
