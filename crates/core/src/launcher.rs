//! Process launching seam for the supervisor.
//!
//! [`ProcessLauncher`] is the only place the supervisor touches the OS. The
//! production implementation, [`TokioLauncher`], spawns a real child via
//! [`tokio::process::Command`]; tests swap in scripted launchers that hand
//! back in-memory streams and a canned exit code.

use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::io::AsyncRead;
use tokio::process::Command;

/// Boxed readable stream of process output.
pub type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

/// Error returned when the external process cannot be started at all.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("executable not found: {program}")]
    NotFound { program: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Classify a spawn failure for `program`.
    pub fn from_io(program: &Path, source: std::io::Error) -> Self {
        let program = program.to_string_lossy().into_owned();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { program }
        } else {
            Self::Spawn { program, source }
        }
    }
}

/// A running external process, split into the parts the supervisor drives
/// independently.
pub struct LaunchedProcess {
    /// Standard output, read line by line.
    pub stdout: OutputStream,
    /// Standard error, consumed for diagnostics only.
    pub stderr: OutputStream,
    /// Resolves with the exit code once the process terminates
    /// (`None` when it was killed by a signal).
    pub exit: BoxFuture<'static, std::io::Result<Option<i32>>>,
}

/// Starts external processes on behalf of the supervisor.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, program: &Path, args: &[String]) -> Result<LaunchedProcess, LaunchError>;
}

/// Launcher backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<LaunchedProcess, LaunchError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LaunchError::from_io(program, e))?;

        let stdout: OutputStream = match child.stdout.take() {
            Some(out) => Box::pin(out),
            None => Box::pin(tokio::io::empty()),
        };
        let stderr: OutputStream = match child.stderr.take() {
            Some(err) => Box::pin(err),
            None => Box::pin(tokio::io::empty()),
        };

        let exit = async move { child.wait().await.map(|status| status.code()) }.boxed();

        Ok(LaunchedProcess {
            stdout,
            stderr,
            exit,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
