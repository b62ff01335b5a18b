//! Download job supervisor.
//!
//! [`Supervisor::start_job`] registers a job, hands the `yt-dlp` invocation
//! to a background task and returns the job id straight away. The task then
//! owns the job until it reaches a terminal state:
//!
//! 1. optionally wait for an admission permit (bounded concurrency),
//! 2. launch the process; a launch failure marks the job `error`,
//! 3. classify stdout line by line and apply each event in stream order,
//!    while stderr is drained and logged on its own task,
//! 4. once stdout is exhausted and the process has exited, record
//!    `completed` (exit code 0) or `error` (anything else).
//!
//! Failures never escape the task; callers observe outcomes only through
//! the registry.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::sync::Semaphore;

use crate::args::{build_args, DownloadRequest};
use crate::launcher::{LaunchedProcess, ProcessLauncher};
use crate::lines::LineReader;
use crate::output::{classify_line, OutputEvent};
use crate::registry::JobRegistry;
use crate::types::JobId;

/// Number of trailing stderr lines reported when a download fails.
const STDERR_TAIL_LINES: usize = 20;

/// Static settings for the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Path to the `yt-dlp` executable.
    pub binary: PathBuf,
    /// Directory downloaded files are written into.
    pub downloads_dir: PathBuf,
    /// Upper bound on concurrently running processes (`None` = unbounded).
    pub max_concurrent_jobs: Option<usize>,
}

/// Launches and tracks one external process per download job.
pub struct Supervisor {
    registry: Arc<JobRegistry>,
    launcher: Arc<dyn ProcessLauncher>,
    config: SupervisorConfig,
    permits: Option<Arc<Semaphore>>,
}

impl Supervisor {
    pub fn new(
        registry: Arc<JobRegistry>,
        launcher: Arc<dyn ProcessLauncher>,
        config: SupervisorConfig,
    ) -> Self {
        let permits = config
            .max_concurrent_jobs
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        Self {
            registry,
            launcher,
            config,
            permits,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Register a job for `request` and start it in the background.
    ///
    /// Returns as soon as the job is registered; the external process runs
    /// entirely off the caller's path.
    pub async fn start_job(&self, request: &DownloadRequest) -> JobId {
        let args = build_args(request, &self.config.downloads_dir);
        let job_id = self.registry.create().await;

        tracing::info!(
            job_id = %job_id,
            url = %request.url,
            audio = request.is_audio(),
            "Download job registered",
        );
        tracing::debug!(job_id = %job_id, ?args, "yt-dlp arguments");

        let task = JobTask {
            job_id,
            registry: Arc::clone(&self.registry),
            launcher: Arc::clone(&self.launcher),
            binary: self.config.binary.clone(),
            args,
            permits: self.permits.clone(),
        };
        tokio::spawn(task.run());

        job_id
    }
}

/// Everything the background task needs, detached from the supervisor.
struct JobTask {
    job_id: JobId,
    registry: Arc<JobRegistry>,
    launcher: Arc<dyn ProcessLauncher>,
    binary: PathBuf,
    args: Vec<String>,
    permits: Option<Arc<Semaphore>>,
}

impl JobTask {
    async fn run(self) {
        let job_id = self.job_id;

        let _permit = match &self.permits {
            Some(permits) => match Arc::clone(permits).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::error!(job_id = %job_id, "Admission semaphore closed");
                    self.registry.fail(&job_id).await;
                    return;
                }
            },
            None => None,
        };

        let LaunchedProcess {
            stdout,
            stderr,
            exit,
        } = match self.launcher.launch(&self.binary, &self.args) {
            Ok(process) => process,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to launch yt-dlp");
                self.registry.fail(&job_id).await;
                return;
            }
        };

        tracing::info!(job_id = %job_id, "yt-dlp started");

        let stderr_task = tokio::spawn(drain_stderr(job_id, stderr));

        let (stdout_result, exit_result) =
            tokio::join!(consume_stdout(&self.registry, job_id, stdout), exit);

        if let Err(e) = stdout_result {
            tracing::warn!(job_id = %job_id, error = %e, "Error reading yt-dlp stdout");
        }

        let stderr_tail = stderr_task.await.unwrap_or_default();

        match exit_result {
            Ok(Some(0)) => {
                self.registry.complete(&job_id).await;
                tracing::info!(job_id = %job_id, "Download completed");
            }
            Ok(exit_code) => {
                self.registry.fail(&job_id).await;
                tracing::error!(
                    job_id = %job_id,
                    exit_code = ?exit_code,
                    stderr = %stderr_tail.join("\n"),
                    "yt-dlp exited with failure",
                );
            }
            Err(e) => {
                self.registry.fail(&job_id).await;
                tracing::error!(job_id = %job_id, error = %e, "Failed waiting for yt-dlp");
            }
        }
    }
}

/// Feed every stdout line through the classifier, in order.
async fn consume_stdout<R: AsyncRead + Unpin>(
    registry: &JobRegistry,
    job_id: JobId,
    stdout: R,
) -> std::io::Result<()> {
    let mut lines = LineReader::new(stdout);
    while let Some(line) = lines.next_line().await? {
        let event = classify_line(&line);
        if event == OutputEvent::NoOp {
            continue;
        }
        if registry.apply(&job_id, &event).await {
            tracing::trace!(job_id = %job_id, ?event, "Job updated");
        }
    }
    Ok(())
}

/// Log stderr as it arrives and keep the last few lines for failure reports.
async fn drain_stderr<R: AsyncRead + Unpin>(job_id: JobId, stderr: R) -> Vec<String> {
    let mut lines = LineReader::new(stderr);
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::warn!(job_id = %job_id, line = %line, "yt-dlp stderr");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Error reading yt-dlp stderr");
                break;
            }
        }
    }
    tail.into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
