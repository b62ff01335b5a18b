//! Download job state and its transition rules.
//!
//! A [`Job`] only ever moves forward: `starting` -> `downloading` ->
//! `completed` | `error`. Once a job is terminal every mutator is a no-op,
//! so late output lines or a racing exit handler cannot rewrite a final
//! state.

use serde::Serialize;

use crate::output::OutputEvent;
use crate::types::Timestamp;

/// Progress reported for a successfully finished job.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Lifecycle status of a download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Starting,
    Downloading,
    Completed,
    Error,
}

impl JobStatus {
    /// `completed` and `error` are terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Snapshot of one download job, as exposed to polling clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub progress: u8,
    pub status: JobStatus,
    /// Base name of the first `Destination:` the tool reported; never replaced.
    ///
    /// With audio extraction this is the pre-conversion file (e.g. `Song.webm`),
    /// which `yt-dlp` deletes once the `.mp3` is written, so a link built from
    /// it under `/downloads` will not resolve. Clients should use
    /// `GET /api/downloads` to find the extracted file.
    pub filename: Option<String>,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl Job {
    /// A freshly registered job: `{progress: 0, status: starting, filename: null}`.
    pub fn new() -> Self {
        Self {
            progress: 0,
            status: JobStatus::Starting,
            filename: None,
            created_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    /// Apply one classified output line.
    ///
    /// Returns `true` if the job changed.
    pub fn apply(&mut self, event: &OutputEvent) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        match event {
            OutputEvent::Progress { percent } => {
                self.status = JobStatus::Downloading;
                self.progress = (*percent).min(PROGRESS_COMPLETE);
                true
            }
            OutputEvent::Destination { filename } => {
                if self.filename.is_some() {
                    return false;
                }
                self.filename = Some(filename.clone());
                true
            }
            OutputEvent::NoOp => false,
        }
    }

    /// Mark the job as successfully finished.
    pub fn complete(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Completed;
        self.progress = PROGRESS_COMPLETE;
        self.finished_at = Some(chrono::Utc::now());
        true
    }

    /// Mark the job as failed. Progress keeps its last observed value.
    pub fn fail(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Error;
        self.finished_at = Some(chrono::Utc::now());
        true
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
