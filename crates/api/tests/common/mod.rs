#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use futures::FutureExt;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ytgrab_api::config::ServerConfig;
use ytgrab_api::router::build_app_router;
use ytgrab_api::state::AppState;
use ytgrab_core::job::Job;
use ytgrab_core::launcher::{LaunchError, LaunchedProcess, ProcessLauncher};
use ytgrab_core::registry::JobRegistry;
use ytgrab_core::supervisor::Supervisor;
use ytgrab_core::types::JobId;

/// Build a test `ServerConfig` with safe defaults pointing at `downloads_dir`.
pub fn test_config(downloads_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        ytdlp_bin: PathBuf::from("/nonexistent/ytgrab-test/yt-dlp"),
        downloads_dir: downloads_dir.to_path_buf(),
        max_concurrent_jobs: None,
        job_retention_secs: None,
    }
}

/// Build the full application router (same middleware stack as production)
/// around the given launcher. Returns the registry for direct inspection.
pub fn build_test_app(
    launcher: Arc<dyn ProcessLauncher>,
    downloads_dir: &Path,
) -> (Router, Arc<JobRegistry>) {
    let config = test_config(downloads_dir);
    let registry = Arc::new(JobRegistry::new());
    let supervisor = Arc::new(Supervisor::new(
        Arc::clone(&registry),
        launcher,
        config.supervisor_config(),
    ));
    let state = AppState::new(Arc::new(config.clone()), supervisor);
    (build_app_router(state, &config), registry)
}

// ---------------------------------------------------------------------------
// Launchers
// ---------------------------------------------------------------------------

/// Launcher that replays canned stdout and exits with `exit_code`.
pub struct ScriptedLauncher {
    pub stdout: String,
    pub exit_code: Option<i32>,
}

impl ScriptedLauncher {
    pub fn new(stdout: &str, exit_code: Option<i32>) -> Arc<Self> {
        Arc::new(Self {
            stdout: stdout.to_string(),
            exit_code,
        })
    }
}

impl ProcessLauncher for ScriptedLauncher {
    fn launch(&self, _program: &Path, _args: &[String]) -> Result<LaunchedProcess, LaunchError> {
        let code = self.exit_code;
        Ok(LaunchedProcess {
            stdout: Box::pin(Cursor::new(self.stdout.clone().into_bytes())),
            stderr: Box::pin(tokio::io::empty()),
            exit: async move { Ok(code) }.boxed(),
        })
    }
}

/// Launcher that always fails as if the binary were missing.
pub struct MissingBinaryLauncher;

impl ProcessLauncher for MissingBinaryLauncher {
    fn launch(&self, program: &Path, _args: &[String]) -> Result<LaunchedProcess, LaunchError> {
        Err(LaunchError::from_io(
            program,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

/// POST a raw body, optionally without a content type.
pub async fn post_raw(
    app: Router,
    uri: &str,
    body: &'static str,
    content_type: Option<&str>,
) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(body), content_type).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Poll the registry until the job is terminal.
pub async fn wait_terminal(registry: &JobRegistry, id: &JobId) -> Job {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(job) = registry.get(id).await {
                if job.status.is_terminal() {
                    return job;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
