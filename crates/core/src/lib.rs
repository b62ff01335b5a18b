//! Download job supervision for the ytgrab service.
//!
//! Everything here is independent of HTTP: the registry of jobs, the
//! `yt-dlp` output classifier, the process supervisor that drives one
//! external process per job, and the thin read side used by handlers.

pub mod args;
pub mod error;
pub mod job;
pub mod launcher;
pub mod library;
pub mod lines;
pub mod metadata;
pub mod output;
pub mod registry;
pub mod status;
pub mod supervisor;
pub mod types;
